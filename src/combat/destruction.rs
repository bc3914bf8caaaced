//! Part destruction: permanent penalties, disabled actions, presentation
//!
//! Safe to call repeatedly on the same part. The stat penalty is applied at
//! most once per part (tracked by `penalty_applied`) and disabled actions
//! live in a set.

use serde::{Deserialize, Serialize};

use crate::catalog::schema::StatPenalty;
use crate::combat::enemy::Enemy;
use crate::combat::stats::Element;
use crate::core::types::{ActionId, EnemyId, PartKey};

/// How a destruction should be described
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestructionKind {
    /// Severable part taken off by non-elemental damage
    Sever,
    /// Destroyed while an element was active
    ElementalDestroy(Element),
    GenericDestroy,
}

/// Everything the host needs to render a part's destruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationEvent {
    pub enemy: EnemyId,
    pub enemy_name: String,
    pub part: PartKey,
    pub part_name: String,
    pub kind: DestructionKind,
    /// A vital part fell; the host should schedule defeat
    pub lethal: bool,
    /// Penalty applied by this call, `None` if none or already applied
    pub penalty: Option<StatPenalty>,
    /// Actions newly disabled by this call
    pub disabled_actions: Vec<ActionId>,
}

impl PresentationEvent {
    pub fn message(&self) -> String {
        match self.kind {
            DestructionKind::Sever => {
                format!("{}'s {} was severed!", self.enemy_name, self.part_name)
            }
            DestructionKind::ElementalDestroy(element) => format!(
                "{}'s {} was {}!",
                self.enemy_name,
                self.part_name,
                element.destruction_verb()
            ),
            DestructionKind::GenericDestroy => {
                format!("{}'s {} was destroyed!", self.enemy_name, self.part_name)
            }
        }
    }

    pub fn penalty_message(&self) -> Option<String> {
        let penalty = self.penalty?;
        let direction = if penalty.amount < 0 { "fell" } else { "rose" };
        Some(format!(
            "{}'s {} {} by {}.",
            self.enemy_name,
            penalty.stat,
            direction,
            penalty.amount.abs()
        ))
    }

    /// Lines for a combat log, in display order
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.message()];
        lines.extend(self.penalty_message());
        if !self.disabled_actions.is_empty() {
            lines.push(format!("{} can no longer use some of its abilities.", self.enemy_name));
        }
        if self.lethal {
            lines.push(format!("{} collapses!", self.enemy_name));
        }
        lines
    }
}

/// Handle a part reaching zero health
///
/// Returns `None` only when the enemy has no such part.
pub fn on_destroyed(
    enemy: &mut Enemy,
    key: &PartKey,
    element: Option<Element>,
) -> Option<PresentationEvent> {
    let (part_name, vital, can_sever, stat_penalty) = match enemy.part_def(key) {
        Some(def) => (def.display_name.clone(), def.vital, def.can_sever, def.stat_penalty),
        None => (key.to_string(), false, false, None),
    };

    let (newly_destroyed, apply_penalty) = {
        let part = enemy.part_mut(key)?;
        let newly_destroyed = !part.destroyed;
        part.destroyed = true;
        part.current_health = 0;
        let apply_penalty = !part.penalty_applied;
        part.penalty_applied = true;
        (newly_destroyed, apply_penalty)
    };

    let penalty = stat_penalty.filter(|_| apply_penalty);
    if let Some(p) = penalty {
        enemy.modifiers_mut().add(p.stat, p.amount);
    }

    let effect_actions = enemy.part_effect(key).to_vec();
    let disabled_actions = enemy.disabled_mut().extend(&effect_actions);

    if vital {
        enemy.mark_lethal();
    }

    let kind = match element {
        Some(element) => DestructionKind::ElementalDestroy(element),
        None if can_sever => DestructionKind::Sever,
        None => DestructionKind::GenericDestroy,
    };

    if newly_destroyed {
        tracing::info!(
            enemy = %enemy.name,
            part = %key,
            kind = ?kind,
            lethal = vital,
            "Part destroyed"
        );
    }

    Some(PresentationEvent {
        enemy: enemy.id,
        enemy_name: enemy.name.clone(),
        part: key.clone(),
        part_name,
        kind,
        lethal: vital,
        penalty,
        disabled_actions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::registry::ArchetypeRegistry;
    use crate::combat::stats::{Stat, StatBlock};
    use crate::core::config::PartDamageConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn humanoid() -> Enemy {
        let registry = ArchetypeRegistry::builtin().unwrap();
        let mut enemy = Enemy::new("Bandit", Some("Humanoid"), StatBlock::uniform(100, 20));
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        enemy.initialize(&registry, &PartDamageConfig::default(), &mut rng);
        enemy
    }

    #[test]
    fn test_penalty_applied_once() {
        let mut enemy = humanoid();
        let key = PartKey::from("LEFT_ARM");

        let first = on_destroyed(&mut enemy, &key, None).unwrap();
        let second = on_destroyed(&mut enemy, &key, None).unwrap();

        assert_eq!(first.penalty, Some(StatPenalty { stat: Stat::Attack, amount: -4 }));
        assert_eq!(second.penalty, None);
        assert_eq!(enemy.effective_stat(Stat::Attack), 16);
    }

    #[test]
    fn test_classification() {
        let mut enemy = humanoid();
        let arm = on_destroyed(&mut enemy, &"LEFT_ARM".into(), None).unwrap();
        assert_eq!(arm.kind, DestructionKind::Sever);

        let leg = on_destroyed(&mut enemy, &"LEFT_LEG".into(), Some(Element::Fire)).unwrap();
        assert_eq!(leg.kind, DestructionKind::ElementalDestroy(Element::Fire));
        assert_eq!(leg.message(), "Bandit's Left Leg was burned away!");

        let torso = on_destroyed(&mut enemy, &"TORSO".into(), None).unwrap();
        assert_eq!(torso.kind, DestructionKind::GenericDestroy);
        assert!(!torso.lethal);
    }

    #[test]
    fn test_vital_part_is_lethal() {
        let mut enemy = humanoid();
        let event = on_destroyed(&mut enemy, &"HEAD".into(), None).unwrap();
        assert!(event.lethal);
        assert!(enemy.lethal_part_destroyed());
        assert!(enemy.is_defeated());
        assert_eq!(event.lines().last().unwrap(), "Bandit collapses!");
    }

    #[test]
    fn test_special_effect_disables_actions_once() {
        let mut enemy = humanoid();
        let first = on_destroyed(&mut enemy, &"RIGHT_ARM".into(), None).unwrap();
        assert_eq!(first.disabled_actions, vec![ActionId(10), ActionId(11)]);
        assert_eq!(
            enemy.filter_actions(&[ActionId(1), ActionId(10), ActionId(11)]),
            vec![ActionId(1)]
        );

        let again = on_destroyed(&mut enemy, &"RIGHT_ARM".into(), None).unwrap();
        assert!(again.disabled_actions.is_empty());
    }

    #[test]
    fn test_unknown_part_is_none() {
        let mut enemy = humanoid();
        assert!(on_destroyed(&mut enemy, &"WING".into(), None).is_none());
    }

    #[test]
    fn test_penalty_message() {
        let mut enemy = humanoid();
        let event = on_destroyed(&mut enemy, &"TORSO".into(), None).unwrap();
        assert_eq!(event.penalty_message().unwrap(), "Bandit's Defense fell by 6.");
    }
}
