//! # Charsmith Domain Types
//!
//! Shared vocabulary for the rules model: abilities, skills and gender.
//! Pure data, no I/O, all serializable.

mod ability;
pub use ability::{Ability, Gender, Skill};
