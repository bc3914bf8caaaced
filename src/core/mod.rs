pub mod config;
pub mod error;
pub mod types;

pub use config::{InvalidationPolicy, PartDamageConfig};
pub use error::{PartError, Result};
pub use types::{ActionId, EncounterId, EncounterKey, EnemyId, LocationId, PartKey};
