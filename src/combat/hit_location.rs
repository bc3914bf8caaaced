//! Hit location selection
//!
//! An aimed attack rolls against its hit chance first. Otherwise (or after
//! a miss, when configured to fall through) a part is drawn by weight from
//! the parts that are still intact.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::context::{CombatContext, DirectedMiss};
use crate::combat::enemy::Enemy;
use crate::combat::hit_chance::hit_chance;
use crate::core::config::PartDamageConfig;
use crate::core::types::PartKey;

/// Part chosen to absorb a damage event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitLocation {
    pub key: PartKey,
    /// True only when an aimed attack passed its roll
    pub directed: bool,
}

/// Result of one selection, including a failed aim if there was one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitSelection {
    pub location: Option<HitLocation>,
    pub miss: Option<DirectedMiss>,
}

/// Pick the part that absorbs the next hit on `enemy`
///
/// Always consumes the context's pending target, even when it was aimed at
/// another enemy or at a part that has since been destroyed.
pub fn select_hit_location<R: Rng + ?Sized>(
    enemy: &Enemy,
    ctx: &mut CombatContext,
    config: &PartDamageConfig,
    rng: &mut R,
) -> HitSelection {
    let mut selection = HitSelection::default();

    if let Some(target) = ctx.take_pending_target() {
        let available = target.enemy == enemy.id
            && enemy.part(&target.part).is_some_and(|p| !p.destroyed);

        if available {
            let chance = hit_chance(enemy, &target.part, &ctx.attacker, config);
            let roll = rng.gen_range(0..100);
            if roll < chance {
                tracing::debug!(
                    enemy = %enemy.name,
                    part = %target.part,
                    chance,
                    roll,
                    "Aimed attack hit"
                );
                selection.location = Some(HitLocation {
                    key: target.part,
                    directed: true,
                });
                return selection;
            }

            tracing::debug!(
                enemy = %enemy.name,
                part = %target.part,
                chance,
                roll,
                "Aimed attack missed"
            );
            let miss = DirectedMiss {
                enemy: enemy.id,
                part: target.part,
                chance,
                roll,
            };
            ctx.record_miss(miss.clone());
            selection.miss = Some(miss);

            if !config.missed_directed_falls_through {
                return selection;
            }
        } else {
            tracing::debug!(
                enemy = %enemy.name,
                part = %target.part,
                "Aimed target unavailable, discarded"
            );
        }
    }

    selection.location = random_hit_location(enemy, rng).map(|key| HitLocation {
        key,
        directed: false,
    });
    selection
}

/// Weighted draw over intact parts
///
/// Falls back to the first defined part when no intact part carries weight.
/// Returns `None` only when the enemy has no parts at all.
pub fn random_hit_location<R: Rng + ?Sized>(enemy: &Enemy, rng: &mut R) -> Option<PartKey> {
    let Some(first) = enemy.parts().first() else {
        tracing::warn!(enemy = %enemy.name, "Hit location requested before parts were initialized");
        return None;
    };

    let weights: Vec<(&PartKey, u64)> = enemy
        .parts()
        .iter()
        .filter(|p| !p.destroyed)
        .map(|p| {
            let weight = enemy.archetype().map(|a| a.weight(&p.key)).unwrap_or(0);
            (&p.key, weight as u64)
        })
        .filter(|(_, w)| *w > 0)
        .collect();

    let total: u64 = weights.iter().map(|(_, w)| w).sum();
    if total == 0 {
        tracing::debug!(
            enemy = %enemy.name,
            part = %first.key,
            "No weighted intact parts, using first part"
        );
        return Some(first.key.clone());
    }

    let draw = rng.gen_range(1..=total);
    let mut cumulative = 0;
    for (key, weight) in &weights {
        cumulative += weight;
        if cumulative >= draw {
            return Some((*key).clone());
        }
    }

    // Unreachable: the last cumulative equals total
    weights.last().map(|(key, _)| (*key).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::registry::ArchetypeRegistry;
    use crate::catalog::schema::{Archetype, PartDef};
    use crate::combat::stats::StatBlock;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn enemy_with(archetype: Archetype) -> Enemy {
        let name = archetype.name.clone();
        let mut registry = ArchetypeRegistry::new();
        registry.register(archetype).unwrap();
        let mut enemy = Enemy::new("Target", Some(&name), StatBlock::uniform(100, 10));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        enemy.initialize(&registry, &PartDamageConfig::default(), &mut rng);
        enemy
    }

    fn two_parts() -> Archetype {
        Archetype::new("Pair")
            .with_part(PartDef::new("A", "A", 50), 1)
            .with_part(PartDef::new("B", "B", 50), 3)
    }

    #[test]
    fn test_destroyed_parts_never_selected() {
        let mut enemy = enemy_with(two_parts());
        enemy.parts_mut()[1].destroyed = true;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..1_000 {
            assert_eq!(random_hit_location(&enemy, &mut rng), Some(PartKey::from("A")));
        }
    }

    #[test]
    fn test_all_destroyed_falls_back_to_first_part() {
        let mut enemy = enemy_with(two_parts());
        for part in enemy.parts_mut() {
            part.destroyed = true;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(random_hit_location(&enemy, &mut rng), Some(PartKey::from("A")));
    }

    #[test]
    fn test_unweighted_parts_only_reachable_by_aim() {
        let mut archetype = two_parts().with_part(PartDef::new("CORE", "Core", 10), 1);
        archetype.hit_locations.remove(&PartKey::from("CORE"));
        let enemy = enemy_with(archetype);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..2_000 {
            assert_ne!(random_hit_location(&enemy, &mut rng), Some(PartKey::from("CORE")));
        }
    }

    #[test]
    fn test_uninitialized_enemy_yields_none() {
        let enemy = Enemy::new("Raw", None, StatBlock::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(random_hit_location(&enemy, &mut rng), None);
    }

    #[test]
    fn test_certain_aim_hits_and_clears_target() {
        let enemy = enemy_with(two_parts());
        let config = PartDamageConfig {
            min_hit_chance: 100,
            max_hit_chance: 100,
            ..PartDamageConfig::default()
        };
        let mut ctx = CombatContext::default();
        ctx.set_directed_target(enemy.id, PartKey::from("A"));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let selection = select_hit_location(&enemy, &mut ctx, &config, &mut rng);
        assert_eq!(
            selection.location,
            Some(HitLocation { key: PartKey::from("A"), directed: true })
        );
        assert!(selection.miss.is_none());
        assert!(ctx.pending_target().is_none());
    }

    #[test]
    fn test_impossible_aim_misses_and_falls_through() {
        let enemy = enemy_with(two_parts());
        let config = PartDamageConfig {
            min_hit_chance: 0,
            max_hit_chance: 0,
            ..PartDamageConfig::default()
        };
        let mut ctx = CombatContext::default();
        ctx.set_directed_target(enemy.id, PartKey::from("A"));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let selection = select_hit_location(&enemy, &mut ctx, &config, &mut rng);
        assert!(!selection.location.unwrap().directed);
        assert_eq!(selection.miss.unwrap().part, PartKey::from("A"));
        assert_eq!(ctx.misses().len(), 1);
        assert!(ctx.pending_target().is_none());
    }

    #[test]
    fn test_miss_without_fall_through_hits_nothing() {
        let enemy = enemy_with(two_parts());
        let config = PartDamageConfig {
            min_hit_chance: 0,
            max_hit_chance: 0,
            missed_directed_falls_through: false,
            ..PartDamageConfig::default()
        };
        let mut ctx = CombatContext::default();
        ctx.set_directed_target(enemy.id, PartKey::from("B"));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let selection = select_hit_location(&enemy, &mut ctx, &config, &mut rng);
        assert!(selection.location.is_none());
        assert!(selection.miss.is_some());
    }

    #[test]
    fn test_target_on_other_enemy_is_discarded() {
        let enemy = enemy_with(two_parts());
        let config = PartDamageConfig {
            min_hit_chance: 100,
            max_hit_chance: 100,
            ..PartDamageConfig::default()
        };
        let mut ctx = CombatContext::default();
        ctx.set_directed_target(crate::core::types::EnemyId::new(), PartKey::from("A"));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let selection = select_hit_location(&enemy, &mut ctx, &config, &mut rng);
        assert!(!selection.location.unwrap().directed);
        assert!(selection.miss.is_none());
        assert!(ctx.pending_target().is_none());
    }

    #[test]
    fn test_target_on_destroyed_part_is_discarded() {
        let mut enemy = enemy_with(two_parts());
        enemy.parts_mut()[0].destroyed = true;
        let mut ctx = CombatContext::default();
        ctx.set_directed_target(enemy.id, PartKey::from("A"));
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let selection = select_hit_location(&enemy, &mut ctx, &PartDamageConfig::default(), &mut rng);
        assert_eq!(
            selection.location,
            Some(HitLocation { key: PartKey::from("B"), directed: false })
        );
        assert!(ctx.misses().is_empty());
    }
}
