//! Archetype catalog: read-only body layouts shared by enemies

pub mod registry;
pub mod schema;

pub use registry::ArchetypeRegistry;
pub use schema::{Archetype, ArchetypeFile, PartDef, StatPenalty};
