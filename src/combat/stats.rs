//! Stat vocabulary shared with the host combat engine
//!
//! The host owns the damage formula and the raw parameter values. This
//! module only names the stats so part penalties and hit-chance ratios can
//! refer to them with a type instead of a bare index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Combat parameters the host exposes per battler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    MaxHp,
    Attack,
    Defense,
    MagicAttack,
    MagicDefense,
    Agility,
    Luck,
}

impl Stat {
    pub fn all() -> [Stat; 7] {
        [
            Stat::MaxHp,
            Stat::Attack,
            Stat::Defense,
            Stat::MagicAttack,
            Stat::MagicDefense,
            Stat::Agility,
            Stat::Luck,
        ]
    }

    /// The defender stat an attacking stat is measured against
    pub fn counter(&self) -> Stat {
        match self {
            Stat::MagicAttack | Stat::MagicDefense => Stat::MagicDefense,
            Stat::Agility => Stat::Agility,
            Stat::Luck => Stat::Luck,
            Stat::MaxHp | Stat::Attack | Stat::Defense => Stat::Defense,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stat::MaxHp => "Max HP",
            Stat::Attack => "Attack",
            Stat::Defense => "Defense",
            Stat::MagicAttack => "M.Attack",
            Stat::MagicDefense => "M.Defense",
            Stat::Agility => "Agility",
            Stat::Luck => "Luck",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw (unmodified) parameter values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub magic_attack: i32,
    pub magic_defense: i32,
    pub agility: i32,
    pub luck: i32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::uniform(100, 10)
    }
}

impl StatBlock {
    /// Every stat except max HP set to `value`
    pub fn uniform(max_hp: i32, value: i32) -> Self {
        Self {
            max_hp,
            attack: value,
            defense: value,
            magic_attack: value,
            magic_defense: value,
            agility: value,
            luck: value,
        }
    }

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::MaxHp => self.max_hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::MagicAttack => self.magic_attack,
            Stat::MagicDefense => self.magic_defense,
            Stat::Agility => self.agility,
            Stat::Luck => self.luck,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        match stat {
            Stat::MaxHp => self.max_hp = value,
            Stat::Attack => self.attack = value,
            Stat::Defense => self.defense = value,
            Stat::MagicAttack => self.magic_attack = value,
            Stat::MagicDefense => self.magic_defense = value,
            Stat::Agility => self.agility = value,
            Stat::Luck => self.luck = value,
        }
    }
}

/// Equipped weapon family, used to pick the attacking stat for aimed attacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCategory {
    Sword,
    Dagger,
    Axe,
    Mace,
    Spear,
    Fist,
    Bow,
    Gun,
    Thrown,
    Staff,
    Wand,
    Shield,
}

impl WeaponCategory {
    pub fn all() -> [WeaponCategory; 12] {
        [
            WeaponCategory::Sword,
            WeaponCategory::Dagger,
            WeaponCategory::Axe,
            WeaponCategory::Mace,
            WeaponCategory::Spear,
            WeaponCategory::Fist,
            WeaponCategory::Bow,
            WeaponCategory::Gun,
            WeaponCategory::Thrown,
            WeaponCategory::Staff,
            WeaponCategory::Wand,
            WeaponCategory::Shield,
        ]
    }
}

/// Elemental damage categories; `None` on a damage event means non-elemental
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Ice,
    Thunder,
    Water,
    Earth,
    Wind,
    Light,
    Dark,
}

impl Element {
    /// Verb used when an element destroys a part outright
    pub fn destruction_verb(&self) -> &'static str {
        match self {
            Element::Fire => "burned away",
            Element::Ice => "frozen and shattered",
            Element::Thunder => "blasted apart",
            Element::Water => "torn away by the current",
            Element::Earth => "crushed",
            Element::Wind => "shredded",
            Element::Light => "purged",
            Element::Dark => "consumed by darkness",
        }
    }
}

/// What the combat engine tells us about whoever is attacking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackerProfile {
    pub name: String,
    pub weapon: Option<WeaponCategory>,
    pub stats: StatBlock,
}

impl AttackerProfile {
    pub fn new(name: impl Into<String>, weapon: Option<WeaponCategory>, stats: StatBlock) -> Self {
        Self {
            name: name.into(),
            weapon,
            stats,
        }
    }
}
