//! Encounter persistence: part damage survives leaving and re-entering a
//! fight at the same location

pub mod snapshot;
pub mod store;

pub use snapshot::{invalidate_all, restore, snapshot, EncounterSnapshot};
pub use store::{SaveData, SessionSnapshots, SnapshotStore, StoredEncounter};
