//! Value objects - Immutable objects defined by their attributes

mod ability_scores;
mod currency;
mod derived_stats;
mod equipment_ref;
mod grants;
mod locks;
mod spell_book;

pub use ability_scores::{
    ability_modifier, AbilityBreakdown, AbilityScores, AbilityTable, DEFAULT_ABILITY_SCORE,
    MAX_ABILITY_SCORE, MAX_MANUAL_BONUS, MIN_ABILITY_SCORE,
};
pub use currency::{Currency, Denomination};
pub use derived_stats::DerivedStats;
pub use equipment_ref::EquipmentRef;
pub use grants::Grants;
pub use locks::{LockField, LockSet};
pub use spell_book::{SpellBook, SpellBucket};
