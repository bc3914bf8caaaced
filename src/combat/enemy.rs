//! Enemy instance: base stats from the host plus the part layer
//!
//! An enemy owns its part states, stat modifiers and disabled actions for
//! its whole lifetime. The archetype is shared and never mutated.

use ahash::{AHashMap, AHashSet};
use rand::Rng;
use std::sync::Arc;

use crate::catalog::registry::ArchetypeRegistry;
use crate::catalog::schema::{Archetype, PartDef};
use crate::combat::modifiers::{DisabledActions, StatModifierSet};
use crate::combat::part_state::PartState;
use crate::combat::stats::{Stat, StatBlock};
use crate::core::config::PartDamageConfig;
use crate::core::types::{ActionId, EnemyId, PartKey};

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub name: String,
    /// Archetype name from the enemy's configuration, if any
    pub archetype_tag: Option<String>,
    /// Raw parameters as the host defines them
    pub base_stats: StatBlock,
    /// Overall HP, owned by the host's damage formula
    pub hp: i32,
    archetype: Option<Arc<Archetype>>,
    parts: Vec<PartState>,
    /// Resolved special effect actions per part
    part_effects: AHashMap<PartKey, Vec<ActionId>>,
    modifiers: StatModifierSet,
    disabled: DisabledActions,
    lethal_part_destroyed: bool,
}

impl Enemy {
    pub fn new(name: &str, archetype_tag: Option<&str>, base_stats: StatBlock) -> Self {
        Self {
            id: EnemyId::new(),
            name: name.to_string(),
            archetype_tag: archetype_tag.map(str::to_string),
            hp: base_stats.max_hp,
            base_stats,
            archetype: None,
            parts: Vec::new(),
            part_effects: AHashMap::new(),
            modifiers: StatModifierSet::new(),
            disabled: DisabledActions::default(),
            lethal_part_destroyed: false,
        }
    }

    /// Build the part layer from the catalog; no-op when already built
    ///
    /// Returns true if parts were created by this call.
    pub fn initialize<R: Rng + ?Sized>(
        &mut self,
        registry: &ArchetypeRegistry,
        config: &PartDamageConfig,
        rng: &mut R,
    ) -> bool {
        if self.is_initialized() {
            return false;
        }

        let archetype =
            registry.resolve(self.archetype_tag.as_deref(), &config.default_archetype);
        let max_hp = self.max_hp();

        self.parts = archetype
            .parts
            .iter()
            .map(|def| PartState::from_def(def, max_hp, config.hit_jitter, rng))
            .collect();

        self.part_effects.clear();
        for def in &archetype.parts {
            let Some(effect) = &def.special_effect else {
                continue;
            };
            match registry.effect_actions(effect) {
                Some(actions) => {
                    self.part_effects.insert(def.key.clone(), actions.to_vec());
                }
                None => tracing::warn!(
                    enemy = %self.name,
                    part = %def.key,
                    effect = %effect,
                    "Unknown special effect, part will disable nothing"
                ),
            }
        }

        tracing::debug!(
            enemy = %self.name,
            archetype = %archetype.name,
            parts = self.parts.len(),
            "Initialized body parts"
        );
        self.archetype = Some(archetype);
        true
    }

    pub fn is_initialized(&self) -> bool {
        !self.parts.is_empty()
    }

    pub fn archetype(&self) -> Option<&Archetype> {
        self.archetype.as_deref()
    }

    pub fn parts(&self) -> &[PartState] {
        &self.parts
    }

    pub fn part(&self, key: &PartKey) -> Option<&PartState> {
        self.parts.iter().find(|p| &p.key == key)
    }

    pub(crate) fn part_mut(&mut self, key: &PartKey) -> Option<&mut PartState> {
        self.parts.iter_mut().find(|p| &p.key == key)
    }

    pub(crate) fn parts_mut(&mut self) -> &mut [PartState] {
        &mut self.parts
    }

    pub fn part_def(&self, key: &PartKey) -> Option<&PartDef> {
        self.archetype.as_deref().and_then(|a| a.part(key))
    }

    pub(crate) fn part_effect(&self, key: &PartKey) -> &[ActionId] {
        self.part_effects.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn intact_part_count(&self) -> usize {
        self.parts.iter().filter(|p| !p.destroyed).count()
    }

    /// Base value plus part penalties, never below 1
    pub fn effective_stat(&self, stat: Stat) -> i32 {
        self.modifiers.apply(stat, self.base_stats.get(stat))
    }

    pub fn max_hp(&self) -> i32 {
        self.effective_stat(Stat::MaxHp)
    }

    /// Overall HP fraction as reported by the host
    pub fn health_fraction(&self) -> f64 {
        self.hp.max(0) as f64 / self.max_hp() as f64
    }

    /// Host-side HP change; the part layer never touches overall HP
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount.max(0)).max(0);
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0 || self.lethal_part_destroyed
    }

    pub fn modifiers(&self) -> &StatModifierSet {
        &self.modifiers
    }

    pub(crate) fn modifiers_mut(&mut self) -> &mut StatModifierSet {
        &mut self.modifiers
    }

    /// Actions the host must not let this enemy use
    pub fn disabled_action_ids(&self) -> &AHashSet<ActionId> {
        self.disabled.ids()
    }

    pub(crate) fn disabled_mut(&mut self) -> &mut DisabledActions {
        &mut self.disabled
    }

    pub fn is_action_disabled(&self, id: ActionId) -> bool {
        self.disabled.contains(id)
    }

    /// Keep only the actions still available to this enemy
    pub fn filter_actions(&self, actions: &[ActionId]) -> Vec<ActionId> {
        actions
            .iter()
            .copied()
            .filter(|id| !self.disabled.contains(*id))
            .collect()
    }

    /// Latched once a vital part is destroyed
    pub fn lethal_part_destroyed(&self) -> bool {
        self.lethal_part_destroyed
    }

    pub(crate) fn mark_lethal(&mut self) {
        self.lethal_part_destroyed = true;
    }

    /// Drop everything derived from destroyed parts
    pub(crate) fn reset_derived_state(&mut self) {
        self.modifiers.clear();
        self.disabled.clear();
        self.lethal_part_destroyed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(tag: Option<&str>) -> Enemy {
        let registry = ArchetypeRegistry::builtin().unwrap();
        let config = PartDamageConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut enemy = Enemy::new("Bandit", tag, StatBlock::uniform(100, 20));
        assert!(enemy.initialize(&registry, &config, &mut rng));
        enemy
    }

    #[test]
    fn test_initialize_builds_parts_in_catalog_order() {
        let enemy = setup(Some("Humanoid"));
        let keys: Vec<_> = enemy.parts().iter().map(|p| p.key.as_str()).collect();
        assert_eq!(
            keys,
            ["HEAD", "TORSO", "LEFT_ARM", "RIGHT_ARM", "LEFT_LEG", "RIGHT_LEG"]
        );
        assert_eq!(enemy.part(&"TORSO".into()).unwrap().max_health, 40);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let registry = ArchetypeRegistry::builtin().unwrap();
        let config = PartDamageConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut enemy = setup(Some("Beast"));
        let before = enemy.parts().to_vec();

        assert!(!enemy.initialize(&registry, &config, &mut rng));
        assert_eq!(enemy.parts(), &before[..]);
    }

    #[test]
    fn test_untagged_enemy_gets_default_archetype() {
        let enemy = setup(None);
        assert_eq!(enemy.archetype().unwrap().name, "Humanoid");
    }

    #[test]
    fn test_empty_registry_still_yields_a_part() {
        let registry = ArchetypeRegistry::new();
        let config = PartDamageConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut enemy = Enemy::new("Wisp", Some("Wisp"), StatBlock::uniform(60, 5));
        enemy.initialize(&registry, &config, &mut rng);

        assert_eq!(enemy.parts().len(), 1);
        assert_eq!(enemy.parts()[0].max_health, 60);
    }

    #[test]
    fn test_special_effects_resolved_at_initialize() {
        let enemy = setup(Some("Humanoid"));
        assert_eq!(
            enemy.part_effect(&"RIGHT_ARM".into()),
            &[ActionId(10), ActionId(11)]
        );
        assert!(enemy.part_effect(&"TORSO".into()).is_empty());
    }

    #[test]
    fn test_health_fraction_and_take_damage() {
        let mut enemy = Enemy::new("Bandit", None, StatBlock::uniform(80, 10));
        enemy.take_damage(20);
        assert!((enemy.health_fraction() - 0.75).abs() < 1e-9);
        enemy.take_damage(500);
        assert_eq!(enemy.hp, 0);
        assert!(enemy.is_defeated());
    }
}
