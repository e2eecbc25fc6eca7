//! Background records.

use serde::{Deserialize, Serialize};

use super::choice_block::{ChoiceBlock, Reference};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub starting_proficiencies: Vec<Reference>,
    #[serde(default)]
    pub starting_proficiency_options: Option<ChoiceBlock>,
    #[serde(default)]
    pub language_options: Option<ChoiceBlock>,
    #[serde(default)]
    pub feature: Option<BackgroundFeature>,
}

/// The narrative feature a background grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundFeature {
    pub name: String,
    #[serde(default)]
    pub desc: Vec<String>,
}

impl Background {
    pub fn new(index: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            starting_proficiencies: Vec::new(),
            starting_proficiency_options: None,
            language_options: None,
            feature: None,
        }
    }

    pub fn with_proficiency(mut self, index: &str, name: &str) -> Self {
        self.starting_proficiencies.push(Reference::new(index, name));
        self
    }

    pub fn with_language_options(mut self, block: ChoiceBlock) -> Self {
        self.language_options = Some(block);
        self
    }

    pub fn with_feature(mut self, name: impl Into<String>, desc: Vec<String>) -> Self {
        self.feature = Some(BackgroundFeature {
            name: name.into(),
            desc,
        });
        self
    }
}
