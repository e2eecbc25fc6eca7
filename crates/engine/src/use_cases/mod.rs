//! Use cases - orchestration over the domain model.

pub mod character;

pub use character::{CharacterBuilder, CharacterObserver, Randomizer};
