//! Battle session: the surface the host combat engine calls into
//!
//! One damage event runs selection, application, destruction handling and
//! the persistence snapshot before returning. Lifecycle hooks drive restore
//! and invalidation.

use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use super::listener::PartEventListener;
use crate::catalog::registry::ArchetypeRegistry;
use crate::combat::context::{CombatContext, DamageEvent, DirectedMiss};
use crate::combat::damage::apply_damage;
use crate::combat::destruction::PresentationEvent;
use crate::combat::enemy::Enemy;
use crate::combat::hit_location::{select_hit_location, HitLocation};
use crate::combat::inspect::{inspect_parts, PartView};
use crate::combat::regeneration::regenerate_parts;
use crate::combat::stats::AttackerProfile;
use crate::core::config::PartDamageConfig;
use crate::core::types::{EncounterKey, EnemyId, LocationId, PartKey};
use crate::persistence::snapshot::{invalidate_all, restore, snapshot};
use crate::persistence::store::{SessionSnapshots, SnapshotStore};

/// What happened to one damage event, for the host's combat log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DamageReport {
    pub enemy: EnemyId,
    pub enemy_name: String,
    /// `None` when a missed aim did not fall through
    pub location: Option<HitLocation>,
    pub part_name: Option<String>,
    pub miss: Option<DirectedMiss>,
    pub missed_part_name: Option<String>,
    pub applied: i32,
    pub floored: bool,
    pub destruction: Option<PresentationEvent>,
}

impl DamageReport {
    pub fn messages(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(name) = &self.missed_part_name {
            lines.push(format!("The attack aimed at {}'s {} missed!", self.enemy_name, name));
        }
        if let (Some(location), Some(name)) = (&self.location, &self.part_name) {
            let how = if location.directed { "Aimed hit" } else { "Hit" };
            lines.push(format!(
                "{how}: {}'s {} takes {} damage.",
                self.enemy_name, name, self.applied
            ));
        }
        if let Some(event) = &self.destruction {
            lines.extend(event.lines());
        }
        lines
    }
}

pub struct BattleSession<S: SnapshotStore = SessionSnapshots> {
    registry: Arc<ArchetypeRegistry>,
    config: PartDamageConfig,
    store: S,
    location: Option<LocationId>,
    encounter: Option<EncounterKey>,
    listeners: Vec<Box<dyn PartEventListener>>,
}

impl BattleSession<SessionSnapshots> {
    pub fn new(registry: Arc<ArchetypeRegistry>, config: PartDamageConfig) -> Self {
        Self::with_store(registry, config, SessionSnapshots::new())
    }
}

impl<S: SnapshotStore> BattleSession<S> {
    pub fn with_store(
        registry: Arc<ArchetypeRegistry>,
        config: PartDamageConfig,
        store: S,
    ) -> Self {
        Self {
            registry,
            config,
            store,
            location: None,
            encounter: None,
            listeners: Vec::new(),
        }
    }

    pub fn registry(&self) -> &ArchetypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PartDamageConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn location(&self) -> Option<LocationId> {
        self.location
    }

    pub fn current_encounter(&self) -> Option<EncounterKey> {
        self.encounter
    }

    pub fn subscribe(&mut self, listener: Box<dyn PartEventListener>) {
        self.listeners.push(listener);
    }

    /// Location transition hook; leaving a location invalidates its snapshots
    pub fn change_location(&mut self, location: LocationId) {
        if let Some(previous) = self.location {
            if previous != location {
                invalidate_all(&mut self.store, previous, self.config.invalidation);
            }
        }
        self.location = Some(location);
    }

    /// Encounter start hook: initialize parts and restore a snapshot if any
    pub fn begin_encounter<R: Rng + ?Sized>(
        &mut self,
        key: EncounterKey,
        enemies: &mut [Enemy],
        rng: &mut R,
    ) -> bool {
        if self.location != Some(key.location) {
            self.change_location(key.location);
        }
        self.encounter = Some(key);
        restore(&self.store, key, enemies, &self.registry, &self.config, rng)
    }

    /// Encounter end hook; snapshots stay as they are
    pub fn end_encounter(&mut self) {
        if let Some(key) = self.encounter.take() {
            tracing::debug!(key = %key, "Encounter ended");
        }
    }

    /// Player picked a part for the next attack
    pub fn set_directed_target(&self, ctx: &mut CombatContext, enemy: &Enemy, part: &str) -> bool {
        let key = PartKey::from(part);
        let valid = enemy.part(&key).is_some_and(|p| !p.destroyed);
        if valid {
            ctx.set_directed_target(enemy.id, key);
        } else {
            tracing::debug!(enemy = %enemy.name, part, "Cannot aim at missing or destroyed part");
        }
        valid
    }

    /// Damage event hook: route `event` to one of `enemies[index]`'s parts
    ///
    /// Returns `None` only when `index` is out of range.
    pub fn on_damage_applied<R: Rng + ?Sized>(
        &mut self,
        enemies: &mut [Enemy],
        index: usize,
        ctx: &mut CombatContext,
        event: DamageEvent,
        rng: &mut R,
    ) -> Option<DamageReport> {
        let Some(enemy) = enemies.get_mut(index) else {
            tracing::warn!(index, "Damage event for unknown enemy slot");
            return None;
        };

        if enemy.initialize(&self.registry, &self.config, rng) {
            tracing::warn!(
                enemy = %enemy.name,
                "Enemy damaged before encounter start, parts built late"
            );
        }

        let selection = select_hit_location(enemy, ctx, &self.config, rng);
        let mut report = DamageReport {
            enemy: enemy.id,
            enemy_name: enemy.name.clone(),
            location: None,
            part_name: None,
            missed_part_name: selection
                .miss
                .as_ref()
                .map(|m| display_name(enemy, &m.part)),
            miss: selection.miss,
            applied: 0,
            floored: false,
            destruction: None,
        };

        if let Some(location) = selection.location {
            let applied = apply_damage(
                enemy,
                &location.key,
                event.amount,
                location.directed,
                event.element,
                &self.config,
            );
            report.part_name = Some(display_name(enemy, &location.key));
            report.location = Some(location);
            report.applied = applied.applied;
            report.floored = applied.floored;
            report.destruction = applied.destruction;
        }

        self.notify(&report);

        let changed = report.applied > 0 || report.destruction.is_some();
        if changed {
            if let Some(key) = self.encounter {
                snapshot(&mut self.store, key, enemies);
            }
        }

        Some(report)
    }

    /// Turn end hook: regenerate parts; returns total health restored
    pub fn turn_ended(&mut self, enemies: &mut [Enemy]) -> i32 {
        let mut total = 0;
        for enemy in enemies.iter_mut() {
            total += regenerate_parts(enemy, &self.config)
                .iter()
                .map(|(_, amount)| amount)
                .sum::<i32>();
        }
        if total > 0 {
            if let Some(key) = self.encounter {
                snapshot(&mut self.store, key, enemies);
            }
        }
        total
    }

    /// Inspection / targeting list for the host UI
    pub fn inspect(&self, enemy: &Enemy, attacker: Option<&AttackerProfile>) -> Vec<PartView> {
        inspect_parts(enemy, attacker, &self.config)
    }

    fn notify(&mut self, report: &DamageReport) {
        for listener in &mut self.listeners {
            if let Some(miss) = &report.miss {
                listener.directed_attack_missed(miss);
            }
            if let Some(event) = &report.destruction {
                listener.part_destroyed(event);
                if event.lethal {
                    listener.lethal_part_destroyed(event.enemy);
                }
            }
        }
    }
}

fn display_name(enemy: &Enemy, key: &PartKey) -> String {
    enemy
        .part_def(key)
        .map(|d| d.display_name.clone())
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::stats::StatBlock;
    use crate::core::types::EncounterId;
    use crate::session::listener::EventLog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> BattleSession {
        let registry = Arc::new(ArchetypeRegistry::builtin().unwrap());
        BattleSession::new(registry, PartDamageConfig::default())
    }

    fn key(location: u32) -> EncounterKey {
        EncounterKey::new(LocationId(location), EncounterId(1))
    }

    fn bandits() -> Vec<Enemy> {
        vec![Enemy::new("Bandit", Some("Humanoid"), StatBlock::uniform(100, 20))]
    }

    #[test]
    fn test_damage_event_snapshots_encounter() {
        let mut session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut enemies = bandits();
        session.begin_encounter(key(1), &mut enemies, &mut rng);

        let mut ctx = CombatContext::default();
        let report = session
            .on_damage_applied(&mut enemies, 0, &mut ctx, DamageEvent::physical(5), &mut rng)
            .unwrap();

        assert_eq!(report.applied, 5);
        assert!(session.store().contains(&key(1)));
    }

    #[test]
    fn test_out_of_range_index() {
        let mut session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut enemies = bandits();
        let mut ctx = CombatContext::default();
        assert!(session
            .on_damage_applied(&mut enemies, 3, &mut ctx, DamageEvent::physical(5), &mut rng)
            .is_none());
    }

    #[test]
    fn test_no_snapshot_outside_encounter() {
        let mut session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut enemies = bandits();
        let mut ctx = CombatContext::default();
        session.on_damage_applied(&mut enemies, 0, &mut ctx, DamageEvent::physical(5), &mut rng);
        assert!(session.store().is_empty());
        assert!(enemies[0].is_initialized());
    }

    #[test]
    fn test_location_change_invalidates() {
        let mut session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut enemies = bandits();
        session.begin_encounter(key(1), &mut enemies, &mut rng);
        let mut ctx = CombatContext::default();
        session.on_damage_applied(&mut enemies, 0, &mut ctx, DamageEvent::physical(5), &mut rng);
        session.end_encounter();

        session.change_location(LocationId(1));
        assert_eq!(session.store().len(), 1);
        session.change_location(LocationId(2));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_listener_sees_destruction() {
        let mut session = session();
        let log = Rc::new(RefCell::new(EventLog::default()));
        session.subscribe(Box::new(Rc::clone(&log)));

        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut enemies = bandits();
        session.begin_encounter(key(1), &mut enemies, &mut rng);

        let mut ctx = CombatContext::default();
        while enemies[0].intact_part_count() == 6 {
            session.on_damage_applied(&mut enemies, 0, &mut ctx, DamageEvent::physical(60), &mut rng);
        }
        assert_eq!(log.borrow().destroyed.len(), 1);
    }

    #[test]
    fn test_set_directed_target_rejects_unknown_part() {
        let session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut enemies = bandits();
        enemies[0].initialize(session.registry(), session.config(), &mut rng);

        let mut ctx = CombatContext::default();
        assert!(!session.set_directed_target(&mut ctx, &enemies[0], "TENTACLE"));
        assert!(ctx.pending_target().is_none());
        assert!(session.set_directed_target(&mut ctx, &enemies[0], "HEAD"));
        assert!(ctx.pending_target().is_some());
    }

    #[test]
    fn test_report_messages() {
        let mut session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut enemies = bandits();
        session.begin_encounter(key(1), &mut enemies, &mut rng);
        let mut ctx = CombatContext::default();
        let report = session
            .on_damage_applied(&mut enemies, 0, &mut ctx, DamageEvent::physical(1), &mut rng)
            .unwrap();
        let messages = report.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Hit: Bandit's "));
        assert!(messages[0].ends_with("takes 1 damage."));
    }
}
