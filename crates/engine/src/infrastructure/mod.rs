//! Infrastructure implementations.
//!
//! Everything that touches the outside world: the SRD file importer and
//! environment configuration.

pub mod config;
pub mod importers;
