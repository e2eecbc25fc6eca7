//! Character building: the orchestrator over a draft, change notification,
//! the randomizer and the biography generator.

mod biography;
mod builder;
mod notifier;
mod randomizer;

pub use biography::generate_biography;
pub use builder::{BatchGuard, CharacterBuilder, PickerOption};
pub use notifier::{CharacterObserver, Notifier};
pub use randomizer::Randomizer;

#[cfg(test)]
pub use notifier::MockCharacterObserver;
