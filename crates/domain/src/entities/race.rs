//! Race and subrace records.

use serde::{Deserialize, Serialize};

use super::choice_block::{ChoiceBlock, Reference};
use crate::types::Ability;

/// A flat bonus applied to one ability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityBonus {
    pub ability: Ability,
    pub bonus: i32,
}

impl AbilityBonus {
    pub fn new(ability: Ability, bonus: i32) -> Self {
        Self { ability, bonus }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub index: String,
    pub name: String,
    pub speed: u32,
    #[serde(default)]
    pub ability_bonuses: Vec<AbilityBonus>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub starting_proficiencies: Vec<Reference>,
    #[serde(default)]
    pub starting_proficiency_options: Option<ChoiceBlock>,
    #[serde(default)]
    pub languages: Vec<Reference>,
    #[serde(default)]
    pub language_options: Option<ChoiceBlock>,
    #[serde(default)]
    pub traits: Vec<Reference>,
    #[serde(default)]
    pub subraces: Vec<Subrace>,
}

impl Race {
    pub fn new(index: impl Into<String>, name: impl Into<String>, speed: u32) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            speed,
            ability_bonuses: Vec::new(),
            size: None,
            starting_proficiencies: Vec::new(),
            starting_proficiency_options: None,
            languages: Vec::new(),
            language_options: None,
            traits: Vec::new(),
            subraces: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, ability: Ability, bonus: i32) -> Self {
        self.ability_bonuses.push(AbilityBonus::new(ability, bonus));
        self
    }

    pub fn with_language(mut self, index: &str, name: &str) -> Self {
        self.languages.push(Reference::new(index, name));
        self
    }

    pub fn with_proficiency(mut self, index: &str, name: &str) -> Self {
        self.starting_proficiencies.push(Reference::new(index, name));
        self
    }

    pub fn with_language_options(mut self, block: ChoiceBlock) -> Self {
        self.language_options = Some(block);
        self
    }

    pub fn with_proficiency_options(mut self, block: ChoiceBlock) -> Self {
        self.starting_proficiency_options = Some(block);
        self
    }

    pub fn with_subrace(mut self, subrace: Subrace) -> Self {
        self.subraces.push(subrace);
        self
    }

    /// Finds one of this race's subraces by index or name, case-insensitively.
    pub fn subrace(&self, key: &str) -> Option<&Subrace> {
        let key = key.trim().to_lowercase();
        self.subraces
            .iter()
            .find(|s| s.index == key || s.name.to_lowercase() == key)
    }

    pub fn bonus_for(&self, ability: Ability) -> i32 {
        sum_bonuses(&self.ability_bonuses, ability)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subrace {
    pub index: String,
    pub name: String,
    pub race: String,
    #[serde(default)]
    pub ability_bonuses: Vec<AbilityBonus>,
    #[serde(default)]
    pub starting_proficiencies: Vec<Reference>,
    #[serde(default)]
    pub starting_proficiency_options: Option<ChoiceBlock>,
    #[serde(default)]
    pub languages: Vec<Reference>,
    #[serde(default)]
    pub language_options: Option<ChoiceBlock>,
    #[serde(default)]
    pub traits: Vec<Reference>,
}

impl Subrace {
    pub fn new(index: impl Into<String>, name: impl Into<String>, race: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            race: race.into(),
            ability_bonuses: Vec::new(),
            starting_proficiencies: Vec::new(),
            starting_proficiency_options: None,
            languages: Vec::new(),
            language_options: None,
            traits: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, ability: Ability, bonus: i32) -> Self {
        self.ability_bonuses.push(AbilityBonus::new(ability, bonus));
        self
    }

    pub fn with_proficiency(mut self, index: &str, name: &str) -> Self {
        self.starting_proficiencies.push(Reference::new(index, name));
        self
    }

    pub fn with_language_options(mut self, block: ChoiceBlock) -> Self {
        self.language_options = Some(block);
        self
    }

    pub fn bonus_for(&self, ability: Ability) -> i32 {
        sum_bonuses(&self.ability_bonuses, ability)
    }
}

fn sum_bonuses(bonuses: &[AbilityBonus], ability: Ability) -> i32 {
    bonuses
        .iter()
        .filter(|b| b.ability == ability)
        .map(|b| b.bonus)
        .sum()
}
