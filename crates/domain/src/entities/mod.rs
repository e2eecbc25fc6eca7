//! Typed rules records
//!
//! One record type per dataset category. Every record carries a lowercase
//! `index` and a display `name`; the [`Record`] trait exposes both so the
//! compendium can index any category the same way.

mod background;
mod choice_block;
mod class;
mod equipment;
mod language;
mod proficiency;
mod race;
mod spell;

pub use background::{Background, BackgroundFeature};
pub use choice_block::{ChoiceBlock, ChoiceEntry, Reference};
pub use class::{
    CharacterClass, ClassLevel, LevelSpellcasting, Spellcasting, Subclass, DEFAULT_SUBCLASS_LEVEL,
};
pub use equipment::{Equipment, WEAPON_CATEGORY};
pub use language::{Alignment, Language};
pub use proficiency::{Proficiency, ProficiencyType};
pub use race::{AbilityBonus, Race, Subrace};
pub use spell::Spell;

/// Common identity of every rules record.
pub trait Record {
    fn index(&self) -> &str;
    fn name(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn index(&self) -> &str {
                    &self.index
                }

                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

impl_record!(
    Race,
    Subrace,
    CharacterClass,
    Subclass,
    Background,
    Spell,
    Equipment,
    Proficiency,
    Language,
    Alignment,
);
