//! Per-turn combat context threaded through each damage event
//!
//! Holds who is attacking and the single-slot pending aimed target. The
//! target is consumed by the next hit-location selection whether the aimed
//! attack lands or not.

use serde::{Deserialize, Serialize};

use crate::combat::stats::{AttackerProfile, Element};
use crate::core::types::{EnemyId, PartKey};

/// One already-computed hit from the host damage formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub amount: i32,
    /// `None` for non-elemental damage
    pub element: Option<Element>,
}

impl DamageEvent {
    pub fn physical(amount: i32) -> Self {
        Self {
            amount,
            element: None,
        }
    }

    pub fn elemental(amount: i32, element: Element) -> Self {
        Self {
            amount,
            element: Some(element),
        }
    }
}

/// Part the player chose for the next attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectedTarget {
    pub enemy: EnemyId,
    pub part: PartKey,
}

/// An aimed attack that failed its roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectedMiss {
    pub enemy: EnemyId,
    pub part: PartKey,
    pub chance: i32,
    pub roll: i32,
}

#[derive(Debug, Clone, Default)]
pub struct CombatContext {
    pub attacker: AttackerProfile,
    pending_target: Option<DirectedTarget>,
    misses: Vec<DirectedMiss>,
}

impl CombatContext {
    pub fn new(attacker: AttackerProfile) -> Self {
        Self {
            attacker,
            pending_target: None,
            misses: Vec::new(),
        }
    }

    /// Aim the next attack; replaces any earlier unconsumed choice
    pub fn set_directed_target(&mut self, enemy: EnemyId, part: PartKey) {
        self.pending_target = Some(DirectedTarget { enemy, part });
    }

    pub fn pending_target(&self) -> Option<&DirectedTarget> {
        self.pending_target.as_ref()
    }

    /// Remove and return the pending target
    pub(crate) fn take_pending_target(&mut self) -> Option<DirectedTarget> {
        self.pending_target.take()
    }

    pub(crate) fn record_miss(&mut self, miss: DirectedMiss) {
        self.misses.push(miss);
    }

    /// Aimed attacks that missed during this turn
    pub fn misses(&self) -> &[DirectedMiss] {
        &self.misses
    }
}
