//! Subscriber interface for part events
//!
//! The host registers listeners on the session instead of wrapping engine
//! methods. Every method has a no-op default.

use crate::combat::context::DirectedMiss;
use crate::combat::destruction::PresentationEvent;
use crate::core::types::EnemyId;

pub trait PartEventListener {
    fn part_destroyed(&mut self, _event: &PresentationEvent) {}

    fn directed_attack_missed(&mut self, _miss: &DirectedMiss) {}

    /// A vital part fell; defeat should follow once presentation finishes
    fn lethal_part_destroyed(&mut self, _enemy: EnemyId) {}
}

/// Listener that keeps every event, handy for combat logs and tests
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub destroyed: Vec<PresentationEvent>,
    pub misses: Vec<DirectedMiss>,
    pub lethal: Vec<EnemyId>,
}

impl PartEventListener for EventLog {
    fn part_destroyed(&mut self, event: &PresentationEvent) {
        self.destroyed.push(event.clone());
    }

    fn directed_attack_missed(&mut self, miss: &DirectedMiss) {
        self.misses.push(miss.clone());
    }

    fn lethal_part_destroyed(&mut self, enemy: EnemyId) {
        self.lethal.push(enemy);
    }
}

impl<T: PartEventListener + ?Sized> PartEventListener for std::rc::Rc<std::cell::RefCell<T>> {
    fn part_destroyed(&mut self, event: &PresentationEvent) {
        self.borrow_mut().part_destroyed(event);
    }

    fn directed_attack_missed(&mut self, miss: &DirectedMiss) {
        self.borrow_mut().directed_attack_missed(miss);
    }

    fn lethal_part_destroyed(&mut self, enemy: EnemyId) {
        self.borrow_mut().lethal_part_destroyed(enemy);
    }
}
