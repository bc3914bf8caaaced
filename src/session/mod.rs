//! Host integration: lifecycle hooks, damage pipeline and event listeners

pub mod battle;
pub mod listener;

pub use battle::{BattleSession, DamageReport};
pub use listener::{EventLog, PartEventListener};
