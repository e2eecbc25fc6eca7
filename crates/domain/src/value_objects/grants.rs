//! Proficiency and language sets, one per provenance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{Ability, Skill};

/// Everything a character is proficient in or speaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grants {
    pub skills: BTreeSet<Skill>,
    pub languages: BTreeSet<String>,
    pub tools: BTreeSet<String>,
    pub armor: BTreeSet<String>,
    pub weapons: BTreeSet<String>,
    pub saving_throws: BTreeSet<Ability>,
}

impl Grants {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
            && self.languages.is_empty()
            && self.tools.is_empty()
            && self.armor.is_empty()
            && self.weapons.is_empty()
            && self.saving_throws.is_empty()
    }

    /// Set union of several provenance layers.
    pub fn union<'a>(layers: impl IntoIterator<Item = &'a Grants>) -> Grants {
        let mut merged = Grants::default();
        for layer in layers {
            merged.skills.extend(layer.skills.iter().copied());
            merged.languages.extend(layer.languages.iter().cloned());
            merged.tools.extend(layer.tools.iter().cloned());
            merged.armor.extend(layer.armor.iter().cloned());
            merged.weapons.extend(layer.weapons.iter().cloned());
            merged.saving_throws.extend(layer.saving_throws.iter().copied());
        }
        merged
    }
}
