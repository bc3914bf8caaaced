//! Snapshot and restore of part state across repeated encounters
//!
//! Snapshots are deep copies. Restoring copies back out of the store, so
//! later mutation of the live enemies never reaches the stored data until
//! the next explicit `snapshot`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::store::SnapshotStore;
use crate::catalog::registry::ArchetypeRegistry;
use crate::combat::destruction::on_destroyed;
use crate::combat::enemy::Enemy;
use crate::combat::part_state::PartState;
use crate::core::config::{InvalidationPolicy, PartDamageConfig};
use crate::core::types::{EncounterKey, LocationId, PartKey};

/// Part states of every enemy in one encounter, by troop position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub enemies: Vec<Vec<PartState>>,
}

impl EncounterSnapshot {
    pub fn capture(enemies: &[Enemy]) -> Self {
        Self {
            enemies: enemies.iter().map(|e| e.parts().to_vec()).collect(),
        }
    }
}

/// Record the current part state of an encounter, replacing any older one
pub fn snapshot<S: SnapshotStore + ?Sized>(store: &mut S, key: EncounterKey, enemies: &[Enemy]) {
    store.put(key, EncounterSnapshot::capture(enemies));
    tracing::trace!(key = %key, enemies = enemies.len(), "Encounter snapshot stored");
}

/// Initialize `enemies` and overlay a stored snapshot if one exists
///
/// Returns true when a snapshot was found. Stored parts whose key the
/// current archetype no longer defines are skipped. Stat penalties and
/// disabled actions are re-derived from the restored destroyed flags.
pub fn restore<S, R>(
    store: &S,
    key: EncounterKey,
    enemies: &mut [Enemy],
    registry: &ArchetypeRegistry,
    config: &PartDamageConfig,
    rng: &mut R,
) -> bool
where
    S: SnapshotStore + ?Sized,
    R: Rng + ?Sized,
{
    for enemy in enemies.iter_mut() {
        enemy.initialize(registry, config, rng);
    }

    let Some(stored) = store.get(&key) else {
        tracing::debug!(key = %key, "No snapshot, enemies start fresh");
        return false;
    };

    if stored.enemies.len() != enemies.len() {
        tracing::warn!(
            key = %key,
            stored = stored.enemies.len(),
            live = enemies.len(),
            "Snapshot enemy count differs, restoring by position"
        );
    }

    for (enemy, records) in enemies.iter_mut().zip(&stored.enemies) {
        restore_enemy(enemy, records);
    }

    tracing::info!(key = %key, enemies = enemies.len(), "Restored encounter part state");
    true
}

fn restore_enemy(enemy: &mut Enemy, records: &[PartState]) {
    for record in records {
        match enemy.parts_mut().iter_mut().find(|p| p.key == record.key) {
            Some(part) => *part = record.clone(),
            None => tracing::warn!(
                enemy = %enemy.name,
                part = %record.key,
                "Snapshot part not in archetype, ignored"
            ),
        }
    }

    for part in enemy.parts_mut() {
        part.max_health = part.max_health.max(1);
        part.current_health = part.current_health.clamp(0, part.max_health);
        part.penalty_applied = false;
    }
    enemy.reset_derived_state();

    let destroyed: Vec<PartKey> = enemy
        .parts()
        .iter()
        .filter(|p| p.destroyed)
        .map(|p| p.key.clone())
        .collect();
    for key in destroyed {
        on_destroyed(enemy, &key, None);
    }
}

/// Drop snapshots when the player leaves `location`
pub fn invalidate_all<S: SnapshotStore + ?Sized>(
    store: &mut S,
    location: LocationId,
    policy: InvalidationPolicy,
) -> usize {
    let dropped = store.invalidate(location, policy);
    tracing::debug!(location = location.0, dropped, ?policy, "Snapshots invalidated");
    dropped
}
