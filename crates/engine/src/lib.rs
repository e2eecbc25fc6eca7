//! Charsmith Engine library.
//!
//! Builds tabletop character sheets on top of the rules model in
//! `charsmith-domain`.
//!
//! ## Structure
//!
//! - `use_cases/` - The character builder, its observers, the randomizer and
//!   the biography generator
//! - `infrastructure/` - SRD JSON import and environment configuration

pub mod infrastructure;
pub mod use_cases;

/// Test fixtures module for integration testing.
#[cfg(test)]
pub mod test_fixtures;

/// E2E tests over the sample SRD dataset.
#[cfg(test)]
mod e2e_tests;

pub use infrastructure::importers::{ImportError, SrdImporter};
pub use use_cases::CharacterBuilder;
