//! Aimed attack hit chance
//!
//! Pure function of the current state: base chance, minus part difficulty
//! and vitality, plus a capped stat-ratio bonus and the part's fixed
//! personal offset, clamped to the configured bounds.

use crate::combat::enemy::Enemy;
use crate::combat::stats::AttackerProfile;
use crate::core::config::PartDamageConfig;
use crate::core::types::PartKey;

/// Percent chance (inclusive bounds from config) that an aimed attack lands
pub fn hit_chance(
    enemy: &Enemy,
    key: &PartKey,
    attacker: &AttackerProfile,
    config: &PartDamageConfig,
) -> i32 {
    let Some(part) = enemy.part(key) else {
        tracing::debug!(
            enemy = %enemy.name,
            part = %key,
            "Hit chance requested for unknown part"
        );
        return config.min_hit_chance;
    };

    let (difficulty, vital) = enemy
        .part_def(key)
        .map(|def| (def.hit_difficulty.max(1), def.vital))
        .unwrap_or((1, false));

    let mut chance = config.base_hit_chance as f64;
    chance -= config.difficulty_step as f64 * (difficulty - 1) as f64;
    if vital {
        chance -= config.vital_hit_penalty as f64;
    }

    let stat = config.attacking_stat(attacker.weapon);
    let attacker_value = attacker.stats.get(stat);
    let defender_value = enemy.effective_stat(stat.counter()).max(1);
    let ratio = attacker_value as f64 / defender_value as f64;
    chance += ratio_bonus(ratio, config) as f64;

    chance += part.hit_random_offset * 100.0;

    clamp_chance(chance, config)
}

/// `min(cap, floor((ratio - 1) * factor))` for favorable ratios, else 0
pub fn ratio_bonus(ratio: f64, config: &PartDamageConfig) -> i32 {
    if ratio <= 1.0 || !ratio.is_finite() {
        return 0;
    }
    let bonus = ((ratio - 1.0) * config.ratio_bonus_factor).floor();
    bonus.min(config.max_ratio_bonus as f64).max(0.0) as i32
}

fn clamp_chance(chance: f64, config: &PartDamageConfig) -> i32 {
    if chance.is_nan() {
        return config.min_hit_chance;
    }
    (chance.round() as i32).clamp(config.min_hit_chance, config.max_hit_chance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::registry::ArchetypeRegistry;
    use crate::catalog::schema::{Archetype, PartDef};
    use crate::combat::stats::{StatBlock, WeaponCategory};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn single_part_enemy(def: PartDef, defender: StatBlock) -> Enemy {
        let mut registry = ArchetypeRegistry::new();
        registry
            .register(Archetype::new("Target").with_part(def, 1))
            .unwrap();
        let mut enemy = Enemy::new("Dummy", Some("Target"), defender);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        enemy.initialize(&registry, &PartDamageConfig::default(), &mut rng);
        enemy.parts_mut()[0].hit_random_offset = 0.0;
        enemy
    }

    fn attacker(weapon: Option<WeaponCategory>, value: i32) -> AttackerProfile {
        AttackerProfile::new("Hero", weapon, StatBlock::uniform(100, value))
    }

    #[test]
    fn test_plain_part_even_stats_is_base() {
        let enemy = single_part_enemy(PartDef::new("X", "X", 50), StatBlock::uniform(100, 10));
        let chance = hit_chance(&enemy, &"X".into(), &attacker(None, 10), &PartDamageConfig::default());
        assert_eq!(chance, 80);
    }

    #[test]
    fn test_difficulty_and_vital_penalties() {
        let def = PartDef::new("HEAD", "Head", 10).vital().with_difficulty(2);
        let enemy = single_part_enemy(def, StatBlock::uniform(100, 10));
        let chance = hit_chance(&enemy, &"HEAD".into(), &attacker(None, 10), &PartDamageConfig::default());
        assert_eq!(chance, 80 - 25 - 10);
    }

    #[test]
    fn test_stat_ratio_bonus_capped() {
        let enemy = single_part_enemy(PartDef::new("X", "X", 50), StatBlock::uniform(100, 10));
        let config = PartDamageConfig::default();

        // 1.5x -> +10
        assert_eq!(hit_chance(&enemy, &"X".into(), &attacker(None, 15), &config), 90);
        // 10x -> capped +15, then clamped to 95
        assert_eq!(hit_chance(&enemy, &"X".into(), &attacker(None, 100), &config), 95);
        // Unfavorable ratios never subtract
        assert_eq!(hit_chance(&enemy, &"X".into(), &attacker(None, 1), &config), 80);
    }

    #[test]
    fn test_weapon_picks_stat_pair() {
        let mut defender = StatBlock::uniform(100, 10);
        defender.magic_defense = 40;
        let enemy = single_part_enemy(PartDef::new("X", "X", 50), defender);
        let config = PartDamageConfig::default();

        let mut mage = attacker(Some(WeaponCategory::Wand), 20);
        mage.stats.magic_attack = 20;
        // 20 vs 40 magic defense: no bonus
        assert_eq!(hit_chance(&enemy, &"X".into(), &mage, &config), 80);

        // Sword uses attack vs defense: 20 / 10 = 2.0 -> +15
        let fighter = attacker(Some(WeaponCategory::Sword), 20);
        assert_eq!(hit_chance(&enemy, &"X".into(), &fighter, &config), 95);
    }

    #[test]
    fn test_personal_offset_is_added() {
        let mut enemy = single_part_enemy(PartDef::new("X", "X", 50), StatBlock::uniform(100, 10));
        enemy.parts_mut()[0].hit_random_offset = -0.07;
        let chance = hit_chance(&enemy, &"X".into(), &attacker(None, 10), &PartDamageConfig::default());
        assert_eq!(chance, 73);
    }

    #[test]
    fn test_unknown_part_gets_minimum() {
        let enemy = single_part_enemy(PartDef::new("X", "X", 50), StatBlock::uniform(100, 10));
        let config = PartDamageConfig::default();
        assert_eq!(hit_chance(&enemy, &"NOPE".into(), &attacker(None, 10), &config), 5);
    }

    #[test]
    fn test_ratio_bonus_steps() {
        let config = PartDamageConfig::default();
        assert_eq!(ratio_bonus(1.0, &config), 0);
        assert_eq!(ratio_bonus(1.04, &config), 0);
        assert_eq!(ratio_bonus(1.25, &config), 5);
        assert_eq!(ratio_bonus(f64::INFINITY, &config), 0);
    }

    proptest! {
        #[test]
        fn prop_hit_chance_always_within_bounds(
            difficulty in 1u32..10_000,
            vital in any::<bool>(),
            offset in -1.0f64..1.0,
            attack in -1_000i32..1_000_000,
            defense in -1_000i32..1_000_000,
            weapon_idx in 0usize..13,
        ) {
            let mut def = PartDef::new("X", "X", 50).with_difficulty(difficulty);
            def.vital = vital;
            let mut enemy = single_part_enemy(def, StatBlock::uniform(100, defense));
            enemy.parts_mut()[0].hit_random_offset = offset;

            let weapon = WeaponCategory::all().get(weapon_idx).copied();
            let chance = hit_chance(&enemy, &"X".into(), &attacker(weapon, attack), &PartDamageConfig::default());
            prop_assert!((5..=95).contains(&chance));
        }
    }
}
