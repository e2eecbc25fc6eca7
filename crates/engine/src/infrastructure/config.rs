//! Engine configuration from environment variables.

use std::path::{Path, PathBuf};

use tracing::warn;

pub const SRD_PATH_VAR: &str = "CHARSMITH_SRD_PATH";
pub const SEED_VAR: &str = "CHARSMITH_SEED";
pub const LEVEL_VAR: &str = "CHARSMITH_LEVEL";

pub const DEFAULT_SRD_PATH: &str = "data/srd";

/// Runtime settings for the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory holding the `5e-SRD-*.json` files.
    pub srd_path: PathBuf,
    /// Fixed seed for reproducible randomization.
    pub seed: Option<u64>,
    /// Level to lock before randomizing.
    pub level: Option<i64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            srd_path: PathBuf::from(DEFAULT_SRD_PATH),
            seed: None,
            level: None,
        }
    }
}

impl EngineConfig {
    /// Reads the process environment. Call [`load_dotenv`] first to pick up
    /// `.env` files.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset and
    /// unparsable numbers are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let srd_path = get(SRD_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SRD_PATH));
        let seed = get(SEED_VAR).and_then(|value| match value.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                warn!(var = SEED_VAR, value = %value, error = %e, "Ignoring invalid seed");
                None
            }
        });
        let level = get(LEVEL_VAR).and_then(|value| match value.parse::<i64>() {
            Ok(level) => Some(level),
            Err(e) => {
                warn!(var = LEVEL_VAR, value = %value, error = %e, "Ignoring invalid level");
                None
            }
        });

        Self {
            srd_path,
            seed,
            level,
        }
    }
}

/// Loads `.env.local` then `.env` from `dir`, if present. Values already in
/// the environment win.
pub fn load_dotenv(dir: &Path) {
    for filename in [".env.local", ".env"] {
        let path = dir.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                warn!(path = %path.display(), error = %e, "Failed to load env file");
            }
        }
    }
}
