//! Archetype schema: body-part layouts as they appear in TOML data files
//!
//! ```toml
//! name = "Humanoid"
//!
//! [[parts]]
//! key = "HEAD"
//! display_name = "Head"
//! health_share = 10
//! vital = true
//! hit_difficulty = 2
//!
//! [hit_locations]
//! HEAD = 10
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::combat::constants::{SYNTHETIC_ARCHETYPE, SYNTHETIC_PART_KEY};
use crate::combat::stats::Stat;
use crate::core::types::{ActionId, PartKey};

/// Permanent stat change applied when a part is destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatPenalty {
    pub stat: Stat,
    pub amount: i32,
}

fn default_hit_difficulty() -> u32 {
    1
}

/// Static definition of one body part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDef {
    pub key: PartKey,
    pub display_name: String,
    /// Percent of the enemy's max HP this part holds
    pub health_share: u32,
    #[serde(default)]
    pub vital: bool,
    #[serde(default)]
    pub can_sever: bool,
    #[serde(default)]
    pub regenerates: bool,
    #[serde(default)]
    pub stat_penalty: Option<StatPenalty>,
    /// Id into the registry's special effect table
    #[serde(default)]
    pub special_effect: Option<String>,
    #[serde(default = "default_hit_difficulty")]
    pub hit_difficulty: u32,
}

impl PartDef {
    pub fn new(key: &str, display_name: &str, health_share: u32) -> Self {
        Self {
            key: PartKey::from(key),
            display_name: display_name.to_string(),
            health_share,
            vital: false,
            can_sever: false,
            regenerates: false,
            stat_penalty: None,
            special_effect: None,
            hit_difficulty: 1,
        }
    }

    pub fn vital(mut self) -> Self {
        self.vital = true;
        self
    }

    pub fn severable(mut self) -> Self {
        self.can_sever = true;
        self
    }

    pub fn regenerating(mut self) -> Self {
        self.regenerates = true;
        self
    }

    pub fn with_penalty(mut self, stat: Stat, amount: i32) -> Self {
        self.stat_penalty = Some(StatPenalty { stat, amount });
        self
    }

    pub fn with_effect(mut self, effect: &str) -> Self {
        self.special_effect = Some(effect.to_string());
        self
    }

    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.hit_difficulty = difficulty;
        self
    }
}

/// Named body layout shared read-only by every enemy of that kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    /// Ordered; the first part is the fallback hit location
    pub parts: Vec<PartDef>,
    /// Relative weight for undirected hits; unlisted parts can only be aimed at
    #[serde(default)]
    pub hit_locations: BTreeMap<PartKey, u32>,
}

impl Archetype {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parts: Vec::new(),
            hit_locations: BTreeMap::new(),
        }
    }

    /// Add a part together with its hit-location weight
    pub fn with_part(mut self, part: PartDef, weight: u32) -> Self {
        self.hit_locations.insert(part.key.clone(), weight);
        self.parts.push(part);
        self
    }

    /// Last-resort layout: one part holding all health
    pub fn synthetic() -> Self {
        Archetype::new(SYNTHETIC_ARCHETYPE)
            .with_part(PartDef::new(SYNTHETIC_PART_KEY, "Body", 100), 1)
    }

    pub fn part(&self, key: &PartKey) -> Option<&PartDef> {
        self.parts.iter().find(|p| &p.key == key)
    }

    pub fn weight(&self, key: &PartKey) -> u32 {
        self.hit_locations.get(key).copied().unwrap_or(0)
    }

    /// Schema problems, empty when the archetype is valid
    pub fn problems(&self, known_effect: impl Fn(&str) -> bool) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("name is empty".to_string());
        }
        if self.parts.is_empty() {
            problems.push("no parts defined".to_string());
        }

        for (i, part) in self.parts.iter().enumerate() {
            if self.parts[..i].iter().any(|p| p.key == part.key) {
                problems.push(format!("duplicate part key {}", part.key));
            }
            if part.health_share > 100 {
                problems.push(format!(
                    "{} health_share {} exceeds 100",
                    part.key, part.health_share
                ));
            }
            if part.hit_difficulty == 0 {
                problems.push(format!("{} hit_difficulty must be at least 1", part.key));
            }
            if let Some(effect) = &part.special_effect {
                if !known_effect(effect) {
                    problems.push(format!("{} references unknown effect '{}'", part.key, effect));
                }
            }
        }

        for (key, weight) in &self.hit_locations {
            if self.part(key).is_none() {
                problems.push(format!("hit location {} has no part definition", key));
            }
            if *weight == 0 {
                problems.push(format!("hit location {} has zero weight", key));
            }
        }

        problems
    }
}

/// On-disk form of one archetype file
#[derive(Debug, Clone, Deserialize)]
pub struct ArchetypeFile {
    pub name: String,
    pub parts: Vec<PartDef>,
    #[serde(default)]
    pub hit_locations: BTreeMap<PartKey, u32>,
    /// Effect id -> host actions disabled when a part carrying it is destroyed
    #[serde(default)]
    pub special_effects: BTreeMap<String, Vec<ActionId>>,
}

impl ArchetypeFile {
    pub fn into_parts(self) -> (Archetype, BTreeMap<String, Vec<ActionId>>) {
        (
            Archetype {
                name: self.name,
                parts: self.parts,
                hit_locations: self.hit_locations,
            },
            self.special_effects,
        )
    }
}
