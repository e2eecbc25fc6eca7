//! Class records with their level progression and subclasses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::choice_block::{ChoiceBlock, Reference};
use crate::types::Ability;

/// Subclasses without any recorded feature level unlock at this level.
pub const DEFAULT_SUBCLASS_LEVEL: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterClass {
    pub index: String,
    pub name: String,
    pub hit_die: u8,
    #[serde(default)]
    pub proficiencies: Vec<Reference>,
    #[serde(default)]
    pub proficiency_choices: Vec<ChoiceBlock>,
    #[serde(default)]
    pub saving_throws: Vec<Ability>,
    #[serde(default)]
    pub spellcasting: Option<Spellcasting>,
    /// Progression rows keyed by class level.
    #[serde(default)]
    pub levels: BTreeMap<u8, ClassLevel>,
    #[serde(default)]
    pub subclasses: Vec<Subclass>,
}

impl CharacterClass {
    pub fn new(index: impl Into<String>, name: impl Into<String>, hit_die: u8) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            hit_die,
            proficiencies: Vec::new(),
            proficiency_choices: Vec::new(),
            saving_throws: Vec::new(),
            spellcasting: None,
            levels: BTreeMap::new(),
            subclasses: Vec::new(),
        }
    }

    pub fn with_saving_throws(mut self, abilities: &[Ability]) -> Self {
        self.saving_throws = abilities.to_vec();
        self
    }

    pub fn with_proficiency(mut self, index: &str, name: &str) -> Self {
        self.proficiencies.push(Reference::new(index, name));
        self
    }

    pub fn with_proficiency_choice(mut self, block: ChoiceBlock) -> Self {
        self.proficiency_choices.push(block);
        self
    }

    pub fn with_spellcasting(mut self, ability: Ability) -> Self {
        self.spellcasting = Some(Spellcasting { level: 1, ability });
        self
    }

    pub fn with_level(mut self, level: ClassLevel) -> Self {
        self.levels.insert(level.level, level);
        self
    }

    pub fn with_subclass(mut self, subclass: Subclass) -> Self {
        self.subclasses.push(subclass);
        self
    }

    pub fn level(&self, level: u8) -> Option<&ClassLevel> {
        self.levels.get(&level)
    }

    /// Finds a subclass by index or name, case-insensitively.
    pub fn subclass(&self, key: &str) -> Option<&Subclass> {
        let key = key.trim().to_lowercase();
        self.subclasses
            .iter()
            .find(|s| s.index == key || s.name.to_lowercase() == key)
    }

    pub fn spellcasting_ability(&self) -> Option<Ability> {
        self.spellcasting.map(|s| s.ability)
    }
}

/// Class-wide spellcasting declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spellcasting {
    /// Class level at which casting starts.
    pub level: u8,
    pub ability: Ability,
}

/// One row of a class's level progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassLevel {
    pub level: u8,
    #[serde(default)]
    pub prof_bonus: Option<i32>,
    #[serde(default)]
    pub ability_score_bonuses: u8,
    #[serde(default)]
    pub features: Vec<Reference>,
    #[serde(default)]
    pub spellcasting: Option<LevelSpellcasting>,
}

impl ClassLevel {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            prof_bonus: None,
            ability_score_bonuses: 0,
            features: Vec::new(),
            spellcasting: None,
        }
    }

    pub fn with_spellcasting(mut self, spellcasting: LevelSpellcasting) -> Self {
        self.spellcasting = Some(spellcasting);
        self
    }
}

/// Spellcasting numbers for one class level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpellcasting {
    #[serde(default)]
    pub cantrips_known: Option<u8>,
    #[serde(default)]
    pub spells_known: Option<u8>,
    /// Slot counts for spell levels 1 through 9.
    #[serde(default)]
    pub slots: [u8; 9],
}

impl LevelSpellcasting {
    pub fn with_cantrips(mut self, count: u8) -> Self {
        self.cantrips_known = Some(count);
        self
    }

    pub fn with_spells_known(mut self, count: u8) -> Self {
        self.spells_known = Some(count);
        self
    }

    /// Sets slot counts starting at spell level 1.
    pub fn with_slots(mut self, slots: &[u8]) -> Self {
        for (target, value) in self.slots.iter_mut().zip(slots) {
            *target = *value;
        }
        self
    }

    /// Positive slot counts keyed by spell level.
    pub fn positive_slots(&self) -> BTreeMap<u8, u8> {
        (1u8..)
            .zip(self.slots.iter().copied())
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subclass {
    pub index: String,
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub flavor: Option<String>,
    /// Features granted by the subclass, keyed by class level.
    #[serde(default)]
    pub features_by_level: BTreeMap<u8, Vec<Reference>>,
}

impl Subclass {
    pub fn new(index: impl Into<String>, name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            class: class.into(),
            flavor: None,
            features_by_level: BTreeMap::new(),
        }
    }

    pub fn with_feature_level(mut self, level: u8) -> Self {
        self.features_by_level.entry(level).or_default();
        self
    }

    /// The lowest class level at which this subclass grants anything.
    pub fn earliest_feature_level(&self) -> u8 {
        self.features_by_level
            .keys()
            .next()
            .copied()
            .unwrap_or(DEFAULT_SUBCLASS_LEVEL)
    }
}
