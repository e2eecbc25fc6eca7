//! End-to-end tests over the sample SRD dataset.
//!
//! Every test goes the full way: SRD files on disk, the importer, a
//! [`CharacterBuilder`](crate::use_cases::CharacterBuilder) and its
//! observers.
//!
//! ```bash
//! cargo test -p charsmith-engine --lib e2e_tests
//! ```

mod randomizer_tests;
