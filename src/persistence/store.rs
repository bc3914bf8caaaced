//! Session-wide snapshot store keyed by (location, encounter)

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::snapshot::EncounterSnapshot;
use crate::core::config::InvalidationPolicy;
use crate::core::error::Result;
use crate::core::types::{EncounterKey, LocationId};

/// Storage behind `snapshot` / `restore`
///
/// At most one snapshot per key; `put` overwrites.
pub trait SnapshotStore {
    fn get(&self, key: &EncounterKey) -> Option<&EncounterSnapshot>;

    fn put(&mut self, key: EncounterKey, snapshot: EncounterSnapshot);

    /// Drop snapshots for a location being left; returns how many went
    fn invalidate(&mut self, location: LocationId, policy: InvalidationPolicy) -> usize;
}

/// In-memory store living for the play session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshots {
    entries: AHashMap<EncounterKey, EncounterSnapshot>,
}

/// Save-file form of the store: ordered entries instead of a hash map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub encounters: Vec<StoredEncounter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEncounter {
    pub key: EncounterKey,
    pub snapshot: EncounterSnapshot,
}

const SAVE_VERSION: u32 = 1;

impl SessionSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &EncounterKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn to_save_data(&self) -> SaveData {
        let mut encounters: Vec<StoredEncounter> = self
            .entries
            .iter()
            .map(|(key, snapshot)| StoredEncounter {
                key: *key,
                snapshot: snapshot.clone(),
            })
            .collect();
        encounters.sort_by_key(|e| e.key);
        SaveData {
            version: SAVE_VERSION,
            encounters,
        }
    }

    pub fn from_save_data(data: SaveData) -> Self {
        if data.version != SAVE_VERSION {
            tracing::warn!(
                version = data.version,
                expected = SAVE_VERSION,
                "Loading snapshot data from another version"
            );
        }
        Self {
            entries: data
                .encounters
                .into_iter()
                .map(|e| (e.key, e.snapshot))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_save_data())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: SaveData = serde_json::from_str(json)?;
        Ok(Self::from_save_data(data))
    }
}

impl SnapshotStore for SessionSnapshots {
    fn get(&self, key: &EncounterKey) -> Option<&EncounterSnapshot> {
        self.entries.get(key)
    }

    fn put(&mut self, key: EncounterKey, snapshot: EncounterSnapshot) {
        self.entries.insert(key, snapshot);
    }

    fn invalidate(&mut self, location: LocationId, policy: InvalidationPolicy) -> usize {
        let before = self.entries.len();
        match policy {
            InvalidationPolicy::WholeStore => self.entries.clear(),
            InvalidationPolicy::LocationOnly => {
                self.entries.retain(|key, _| key.location != location)
            }
        }
        before - self.entries.len()
    }
}
