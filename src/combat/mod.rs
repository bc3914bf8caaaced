//! Part damage combat layer
//!
//! Damage already computed by the host is routed to one body part, parts
//! break, and broken parts leave permanent stat penalties and disabled
//! actions behind.

pub mod constants;
pub mod context;
pub mod damage;
pub mod destruction;
pub mod enemy;
pub mod hit_chance;
pub mod hit_location;
pub mod inspect;
pub mod modifiers;
pub mod part_state;
pub mod regeneration;
pub mod stats;

pub use context::{CombatContext, DamageEvent, DirectedMiss, DirectedTarget};
pub use damage::{apply_damage, AppliedDamage};
pub use destruction::{on_destroyed, DestructionKind, PresentationEvent};
pub use enemy::Enemy;
pub use hit_chance::hit_chance;
pub use hit_location::{random_hit_location, select_hit_location, HitLocation, HitSelection};
pub use inspect::{displayed_weaknesses, inspect_parts, PartView, WeaknessSource};
pub use modifiers::{DisabledActions, StatModifierSet};
pub use part_state::PartState;
pub use regeneration::regenerate_parts;
pub use stats::{AttackerProfile, Element, Stat, StatBlock, WeaponCategory};
