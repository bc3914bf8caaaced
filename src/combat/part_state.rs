//! Runtime state of one body part on one enemy instance

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::schema::PartDef;
use crate::core::types::PartKey;

/// Mutable sub-health pool, owned by exactly one enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartState {
    pub key: PartKey,
    /// Always at least 1
    pub max_health: i32,
    /// 0..=max_health
    pub current_health: i32,
    pub destroyed: bool,
    pub penalty_applied: bool,
    /// Personal hit-chance modifier rolled once, in [-jitter, +jitter]
    pub hit_random_offset: f64,
}

impl PartState {
    /// Fresh part sized from the enemy's max HP
    pub fn from_def<R: Rng + ?Sized>(
        def: &PartDef,
        enemy_max_hp: i32,
        jitter: f64,
        rng: &mut R,
    ) -> Self {
        let max_health = part_max_health(enemy_max_hp, def.health_share);
        let hit_random_offset = if jitter > 0.0 {
            rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        };

        Self {
            key: def.key.clone(),
            max_health,
            current_health: max_health,
            destroyed: false,
            penalty_applied: false,
            hit_random_offset,
        }
    }

    /// Remaining health as a fraction of max
    pub fn health_fraction(&self) -> f64 {
        self.current_health as f64 / self.max_health.max(1) as f64
    }

    pub fn is_intact(&self) -> bool {
        !self.destroyed && self.current_health == self.max_health
    }
}

/// `max(1, round(enemy_max_hp * share / 100))`
pub fn part_max_health(enemy_max_hp: i32, health_share: u32) -> i32 {
    let raw = (enemy_max_hp.max(0) as f64 * health_share as f64 / 100.0).round() as i32;
    raw.max(1)
}
