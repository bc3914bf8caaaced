//! Partbreak - per-part monster damage model
//!
//! Enemies carry a set of body parts with their own health. Incoming damage
//! lands on one part, parts break or get severed, broken parts weaken the
//! enemy, and the whole picture persists across repeated encounters.

pub mod catalog;
pub mod combat;
pub mod core;
pub mod persistence;
pub mod session;
