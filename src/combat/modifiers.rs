//! Stat modifiers accumulated from destroyed parts
//!
//! Deltas are ADDITIVE and only ever added by the destruction handler.
//! Effective stats never drop below 1.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::combat::stats::Stat;
use crate::core::types::ActionId;

/// Signed delta per stat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifierSet {
    deltas: AHashMap<Stat, i32>,
}

impl StatModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, stat: Stat, amount: i32) {
        *self.deltas.entry(stat).or_insert(0) += amount;
    }

    /// Sum of applied deltas for a stat
    pub fn delta(&self, stat: Stat) -> i32 {
        self.deltas.get(&stat).copied().unwrap_or(0)
    }

    /// `max(1, base + delta)`
    pub fn apply(&self, stat: Stat, base: i32) -> i32 {
        (base + self.delta(stat)).max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.values().all(|&d| d == 0)
    }

    /// Non-zero deltas in stat order, for display
    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        Stat::all()
            .into_iter()
            .map(|stat| (stat, self.delta(stat)))
            .filter(|(_, delta)| *delta != 0)
    }

    pub(crate) fn clear(&mut self) {
        self.deltas.clear();
    }
}

/// Host actions an enemy can no longer use
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabledActions {
    ids: AHashSet<ActionId>,
}

impl DisabledActions {
    pub(crate) fn extend(&mut self, actions: &[ActionId]) -> Vec<ActionId> {
        actions
            .iter()
            .copied()
            .filter(|id| self.ids.insert(*id))
            .collect()
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &AHashSet<ActionId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }
}
