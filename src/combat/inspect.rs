//! Read-only views for the host's inspection and targeting screens

use serde::{Deserialize, Serialize};

use crate::combat::enemy::Enemy;
use crate::combat::hit_chance::hit_chance;
use crate::combat::stats::{AttackerProfile, Element};
use crate::core::config::PartDamageConfig;
use crate::core::types::PartKey;

/// One row of the part list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartView {
    pub key: PartKey,
    pub display_name: String,
    pub current_health: i32,
    pub max_health: i32,
    pub destroyed: bool,
    pub vital: bool,
    /// Only when targeting, and only for parts that can still be aimed at
    pub hit_chance: Option<i32>,
}

/// Element weaknesses are owned by the host; we only forward them
pub trait WeaknessSource {
    fn weaknesses(&self, enemy: &Enemy) -> Vec<Element>;
}

/// Parts in catalog order, with hit chances when `attacker` is given
pub fn inspect_parts(
    enemy: &Enemy,
    attacker: Option<&AttackerProfile>,
    config: &PartDamageConfig,
) -> Vec<PartView> {
    enemy
        .parts()
        .iter()
        .map(|part| {
            let def = enemy.part_def(&part.key);
            PartView {
                key: part.key.clone(),
                display_name: def
                    .map(|d| d.display_name.clone())
                    .unwrap_or_else(|| part.key.to_string()),
                current_health: part.current_health,
                max_health: part.max_health,
                destroyed: part.destroyed,
                vital: def.is_some_and(|d| d.vital),
                hit_chance: attacker
                    .filter(|_| !part.destroyed)
                    .map(|a| hit_chance(enemy, &part.key, a, config)),
            }
        })
        .collect()
}

/// Weaknesses for display, straight from the host
pub fn displayed_weaknesses(source: &dyn WeaknessSource, enemy: &Enemy) -> Vec<Element> {
    source.weaknesses(enemy)
}
