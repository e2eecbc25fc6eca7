//! Content importers for rules data sources.
//!
//! Only the 5e-database SRD JSON format is supported. Importers convert the
//! raw files into domain records and hand back a ready [`Compendium`].
//!
//! [`Compendium`]: charsmith_domain::Compendium

mod srd;
mod srd_types;

pub use srd::{
    ImportError, SrdImporter, ALIGNMENTS_FILE, BACKGROUNDS_FILE, CLASSES_FILE, EQUIPMENT_FILE,
    LANGUAGES_FILE, LEVELS_FILE, PROFICIENCIES_FILE, RACES_FILE, SPELLS_FILE, SUBCLASSES_FILE,
    SUBRACES_FILE,
};
