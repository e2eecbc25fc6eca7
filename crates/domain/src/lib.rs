//! # Charsmith Domain
//!
//! Rules records, the character draft aggregate and the pure rules code that
//! derives a character sheet from player choices. No I/O, no randomness.

pub mod aggregates;
pub mod choices;
pub mod compendium;
pub mod entities;
pub mod error;
pub mod events;
pub mod generation;
pub mod proficiencies;
pub mod rules;
pub mod types;
pub mod value_objects;

pub use aggregates::{normalize_identifier, CharacterDraft, DEFAULT_NAME};
pub use choices::{ChoiceGroup, ChoiceOption, ChoiceSelections, ChoiceSources, OptionKind};
pub use compendium::{Compendium, CompendiumBuilder, RulesDataset};
pub use entities::{
    AbilityBonus, Alignment, Background, BackgroundFeature, CharacterClass, ChoiceBlock,
    ChoiceEntry, ClassLevel, Equipment, Language, LevelSpellcasting, Proficiency, ProficiencyType,
    Race, Record, Reference, Spell, Spellcasting, Subclass, Subrace,
};
pub use error::DomainError;
pub use events::{CharacterEvent, RefreshOutcome, StructuralChange};
pub use types::{Ability, Gender, Skill};
pub use value_objects::{
    ability_modifier, AbilityBreakdown, AbilityScores, AbilityTable, Currency, Denomination,
    DerivedStats, EquipmentRef, Grants, LockField, LockSet, SpellBook, SpellBucket,
};
