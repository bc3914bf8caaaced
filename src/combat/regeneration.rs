//! End-of-turn regrowth for parts flagged `regenerates`
//!
//! Only damaged, intact parts heal. A destroyed part stays destroyed for the
//! rest of the encounter, as does its penalty.

use crate::combat::enemy::Enemy;
use crate::core::config::PartDamageConfig;
use crate::core::types::PartKey;

/// Heal regenerating parts; returns (part, amount healed) for each change
pub fn regenerate_parts(enemy: &mut Enemy, config: &PartDamageConfig) -> Vec<(PartKey, i32)> {
    if config.regen_percent_per_turn == 0 {
        return Vec::new();
    }

    let regenerating: Vec<PartKey> = enemy
        .archetype()
        .map(|a| {
            a.parts
                .iter()
                .filter(|def| def.regenerates)
                .map(|def| def.key.clone())
                .collect()
        })
        .unwrap_or_default();

    let mut healed = Vec::new();
    for key in regenerating {
        let Some(part) = enemy.part_mut(&key) else {
            continue;
        };
        if part.destroyed || part.current_health >= part.max_health {
            continue;
        }

        let step = (part.max_health as u64 * config.regen_percent_per_turn as u64).div_ceil(100);
        let amount = (step as i32).min(part.max_health - part.current_health);
        part.current_health += amount;
        healed.push((key, amount));
    }

    if !healed.is_empty() {
        tracing::debug!(enemy = %enemy.name, parts = healed.len(), "Parts regenerated");
    }
    healed
}
