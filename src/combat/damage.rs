//! Damage application to a single part
//!
//! The host has already computed the damage number. This only decides how
//! much of it the chosen part absorbs, enforcing the vital floor:
//! an undirected hit cannot take a vital part below 1 health while the
//! enemy is above the floor threshold.

use serde::{Deserialize, Serialize};

use crate::combat::constants::VITAL_FLOOR_HEALTH;
use crate::combat::destruction::{on_destroyed, PresentationEvent};
use crate::combat::enemy::Enemy;
use crate::combat::stats::Element;
use crate::core::config::PartDamageConfig;
use crate::core::types::PartKey;

/// Outcome of `apply_damage`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDamage {
    /// Health actually removed from the part
    pub applied: i32,
    /// The vital floor rule reduced the hit
    pub floored: bool,
    pub destruction: Option<PresentationEvent>,
}

impl AppliedDamage {
    pub fn destroyed(&self) -> bool {
        self.destruction.is_some()
    }
}

pub fn apply_damage(
    enemy: &mut Enemy,
    key: &PartKey,
    amount: i32,
    directed: bool,
    element: Option<Element>,
    config: &PartDamageConfig,
) -> AppliedDamage {
    let vital = enemy.part_def(key).is_some_and(|def| def.vital);
    let enemy_healthy = enemy.health_fraction() > config.vital_floor_threshold;
    let enemy_name = enemy.name.clone();

    let Some(part) = enemy.part_mut(key) else {
        tracing::debug!(enemy = %enemy_name, part = %key, "Damage to unknown part ignored");
        return AppliedDamage::default();
    };
    if part.destroyed {
        tracing::debug!(enemy = %enemy_name, part = %key, "Damage to destroyed part ignored");
        return AppliedDamage::default();
    }

    let amount = amount.max(0);
    let lethal_hit = amount >= part.current_health;
    let floored = vital && enemy_healthy && lethal_hit && !directed;

    let applied = if floored {
        (part.current_health - VITAL_FLOOR_HEALTH).max(0)
    } else {
        amount.min(part.current_health)
    };
    part.current_health -= applied;
    let reached_zero = part.current_health == 0;

    if floored {
        tracing::debug!(enemy = %enemy_name, part = %key, applied, "Vital part held at floor");
    }

    let destruction = if reached_zero {
        on_destroyed(enemy, key, element)
    } else {
        None
    };

    AppliedDamage {
        applied,
        floored,
        destruction,
    }
}
