//! Aggregate roots - domain objects that own their related data
//!
//! The character draft is the only aggregate: it owns every player input
//! and the cache of values derived from them, exposes behavior through
//! methods rather than public fields, and reports outcomes from mutations.

pub mod character_draft;

pub use character_draft::{normalize_identifier, CharacterDraft, DEFAULT_NAME};
