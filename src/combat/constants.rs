//! Part damage constants - default values for every tunable in one place
//!
//! `PartDamageConfig::default()` is built from these. Hit chances are whole
//! percentages.

// Aimed attack hit chance
pub const BASE_HIT_CHANCE: i32 = 80;
pub const DIFFICULTY_STEP: i32 = 25;
pub const VITAL_HIT_PENALTY: i32 = 10;
pub const RATIO_BONUS_FACTOR: f64 = 20.0;
pub const MAX_RATIO_BONUS: i32 = 15;
pub const MIN_HIT_CHANCE: i32 = 5;
pub const MAX_HIT_CHANCE: i32 = 95;

/// Half-width of the per-part random offset rolled at initialization
pub const HIT_JITTER: f64 = 0.10;

/// Above this overall health fraction vital parts cannot be one-shot by
/// undirected hits
pub const VITAL_FLOOR_THRESHOLD: f64 = 0.30;

/// Health a protected vital part is left with
pub const VITAL_FLOOR_HEALTH: i32 = 1;

// Regeneration (percent of part max health per turn)
pub const REGEN_PERCENT_PER_TURN: u32 = 10;

pub const DEFAULT_ARCHETYPE: &str = "Humanoid";
pub const SYNTHETIC_PART_KEY: &str = "BODY";
pub const SYNTHETIC_ARCHETYPE: &str = "Body";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_chance_bounds_ordered() {
        assert!(MIN_HIT_CHANCE < MAX_HIT_CHANCE);
        assert!(BASE_HIT_CHANCE > MIN_HIT_CHANCE && BASE_HIT_CHANCE < MAX_HIT_CHANCE);
    }

    #[test]
    fn test_jitter_fits_inside_bounds() {
        assert!(HIT_JITTER > 0.0 && HIT_JITTER < 0.5);
        assert!(VITAL_FLOOR_THRESHOLD > 0.0 && VITAL_FLOOR_THRESHOLD < 1.0);
    }
}
