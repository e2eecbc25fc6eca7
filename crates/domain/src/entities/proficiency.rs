//! Proficiency records and their dataset category.

use serde::{Deserialize, Serialize};

use super::choice_block::Reference;

/// The dataset's category string for a proficiency.
///
/// This category is the only source used to decide whether a proficiency is
/// a tool, armor, weapon, skill or saving throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProficiencyType {
    Armor,
    Weapons,
    #[serde(rename = "Artisan's Tools")]
    ArtisansTools,
    Skills,
    #[serde(rename = "Saving Throws")]
    SavingThrows,
    #[serde(rename = "Other Tools")]
    OtherTools,
    #[serde(rename = "Gaming Sets")]
    GamingSets,
    #[serde(rename = "Musical Instruments")]
    MusicalInstruments,
    Vehicles,
    #[serde(other)]
    Other,
}

impl ProficiencyType {
    /// Tools, instruments, gaming sets, vehicles and uncategorised kit.
    pub fn is_tool(&self) -> bool {
        matches!(
            self,
            Self::ArtisansTools
                | Self::OtherTools
                | Self::GamingSets
                | Self::MusicalInstruments
                | Self::Vehicles
                | Self::Other
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proficiency {
    pub index: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProficiencyType,
    /// What the proficiency points at (a skill, an ability, an item).
    #[serde(default)]
    pub reference: Option<Reference>,
}

impl Proficiency {
    pub fn new(index: impl Into<String>, name: impl Into<String>, kind: ProficiencyType) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            kind,
            reference: None,
        }
    }
}
