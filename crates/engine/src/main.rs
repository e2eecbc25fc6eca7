//! Charsmith - generates a random character from an SRD dataset and prints
//! it as JSON.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use charsmith_domain::{CharacterDraft, ChoiceGroup, DerivedStats};
use charsmith_engine::infrastructure::config::{load_dotenv, EngineConfig};
use charsmith_engine::infrastructure::importers::SrdImporter;
use charsmith_engine::use_cases::CharacterBuilder;

#[derive(Serialize)]
struct Output<'a> {
    character: &'a CharacterDraft,
    choice_groups: &'a BTreeMap<String, ChoiceGroup>,
    derived: &'a DerivedStats,
}

fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary is usually run from `crates/engine`).
    load_dotenv(&Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(".."));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charsmith_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = EngineConfig::from_env();
    tracing::info!(
        srd_path = %config.srd_path.display(),
        seed = ?config.seed,
        level = ?config.level,
        "Starting Charsmith"
    );

    let dataset = SrdImporter::new(config.srd_path.clone())
        .load_shared()
        .with_context(|| format!("Failed to load SRD data from {}", config.srd_path.display()))?;

    let mut builder = CharacterBuilder::new(dataset);
    if let Some(level) = config.level {
        builder.set_level(level);
    }
    match config.seed {
        Some(seed) => builder.randomize_with_seed(seed),
        None => builder.randomize(),
    }

    let output = Output {
        character: builder.draft(),
        choice_groups: builder.choice_groups(),
        derived: builder.derived(),
    };
    let rendered =
        serde_json::to_string_pretty(&output).context("Failed to serialize character")?;
    println!("{rendered}");
    Ok(())
}
