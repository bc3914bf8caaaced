//! Part damage configuration with documented constants
//!
//! All magic numbers of the hit-chance formula, the vital floor rule and
//! regeneration are collected here. Defaults come from
//! `combat::constants`; a TOML file may override any subset.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::combat::constants::*;
use crate::combat::stats::{Stat, WeaponCategory};
use crate::core::error::{PartError, Result};

/// What `invalidate_all` drops when the player changes location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationPolicy {
    /// Drop only snapshots recorded at the location being left
    LocationOnly,
    /// Drop the whole store; encounters never persist across locations
    #[default]
    WholeStore,
}

/// Configuration for the part damage model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartDamageConfig {
    // === AIMED ATTACKS ===
    /// Starting hit chance before any adjustment
    pub base_hit_chance: i32,

    /// Subtracted for every difficulty level above 1
    ///
    /// At 25, a difficulty-3 part starts at 30% before stat bonuses.
    pub difficulty_step: i32,

    /// Extra penalty for aiming at a vital part
    pub vital_hit_penalty: i32,

    /// Bonus per unit of attacker/defender stat ratio above 1.0
    ///
    /// At 20.0, a 1.5x stat advantage grants +10.
    pub ratio_bonus_factor: f64,

    /// Cap on the stat ratio bonus
    pub max_ratio_bonus: i32,

    /// Lowest hit chance an aimed attack can have
    pub min_hit_chance: i32,

    /// Highest hit chance an aimed attack can have
    pub max_hit_chance: i32,

    /// Half-width of the per-part personal offset, as a fraction
    ///
    /// 0.10 means every part carries a fixed modifier in [-10, +10].
    pub hit_jitter: f64,

    /// Whether a missed aimed attack still lands on a random part
    ///
    /// When false, a miss deals no part damage at all.
    pub missed_directed_falls_through: bool,

    /// Attacking stat per weapon family; unlisted families use Attack
    pub weapon_stats: AHashMap<WeaponCategory, Stat>,

    // === DAMAGE ===
    /// Overall health fraction above which undirected hits cannot destroy
    /// a vital part outright
    pub vital_floor_threshold: f64,

    /// Percent of max health a regenerating part recovers per turn
    pub regen_percent_per_turn: u32,

    // === CATALOG / PERSISTENCE ===
    /// Archetype used when an enemy's tag is missing or unknown
    pub default_archetype: String,

    pub invalidation: InvalidationPolicy,
}

impl Default for PartDamageConfig {
    fn default() -> Self {
        Self {
            base_hit_chance: BASE_HIT_CHANCE,
            difficulty_step: DIFFICULTY_STEP,
            vital_hit_penalty: VITAL_HIT_PENALTY,
            ratio_bonus_factor: RATIO_BONUS_FACTOR,
            max_ratio_bonus: MAX_RATIO_BONUS,
            min_hit_chance: MIN_HIT_CHANCE,
            max_hit_chance: MAX_HIT_CHANCE,
            hit_jitter: HIT_JITTER,
            missed_directed_falls_through: true,
            weapon_stats: default_weapon_stats(),
            vital_floor_threshold: VITAL_FLOOR_THRESHOLD,
            regen_percent_per_turn: REGEN_PERCENT_PER_TURN,
            default_archetype: DEFAULT_ARCHETYPE.to_string(),
            invalidation: InvalidationPolicy::default(),
        }
    }
}

fn default_weapon_stats() -> AHashMap<WeaponCategory, Stat> {
    use WeaponCategory::*;
    let mut map = AHashMap::new();
    for weapon in [Sword, Axe, Mace, Spear, Fist] {
        map.insert(weapon, Stat::Attack);
    }
    for weapon in [Dagger, Bow, Gun, Thrown] {
        map.insert(weapon, Stat::Agility);
    }
    for weapon in [Staff, Wand] {
        map.insert(weapon, Stat::MagicAttack);
    }
    map.insert(Shield, Stat::Defense);
    map
}

impl PartDamageConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PartDamageConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Stat an attacker uses when aiming with this weapon
    pub fn attacking_stat(&self, weapon: Option<WeaponCategory>) -> Stat {
        weapon
            .and_then(|w| self.weapon_stats.get(&w).copied())
            .unwrap_or(Stat::Attack)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0..=100).contains(&self.min_hit_chance) || !(0..=100).contains(&self.max_hit_chance) {
            return Err(PartError::InvalidConfig(format!(
                "hit chance bounds ({}, {}) must lie within 0..=100",
                self.min_hit_chance, self.max_hit_chance
            )));
        }

        if self.min_hit_chance > self.max_hit_chance {
            return Err(PartError::InvalidConfig(format!(
                "min_hit_chance ({}) should be <= max_hit_chance ({})",
                self.min_hit_chance, self.max_hit_chance
            )));
        }

        if !(0.0..=0.5).contains(&self.hit_jitter) {
            return Err(PartError::InvalidConfig(format!(
                "hit_jitter ({}) must lie within 0.0..=0.5",
                self.hit_jitter
            )));
        }

        if !(0.0..=1.0).contains(&self.vital_floor_threshold) {
            return Err(PartError::InvalidConfig(format!(
                "vital_floor_threshold ({}) must lie within 0.0..=1.0",
                self.vital_floor_threshold
            )));
        }

        if self.difficulty_step < 0 || self.vital_hit_penalty < 0 || self.max_ratio_bonus < 0 {
            return Err(PartError::InvalidConfig(
                "hit chance penalties and bonuses must not be negative".into(),
            ));
        }

        if self.regen_percent_per_turn > 100 {
            return Err(PartError::InvalidConfig(format!(
                "regen_percent_per_turn ({}) exceeds 100",
                self.regen_percent_per_turn
            )));
        }

        if self.default_archetype.trim().is_empty() {
            return Err(PartError::InvalidConfig("default_archetype is empty".into()));
        }

        Ok(())
    }
}
