//! Per-field locks the randomizer must respect.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockField {
    Name,
    Level,
    Race,
    Subrace,
    Class,
    Subclass,
    Background,
    Alignment,
    Gender,
    Abilities,
    Skills,
    Choices,
    Spells,
    Equipment,
    Currency,
    Notes,
    Biography,
}

impl LockField {
    pub const ALL: [LockField; 17] = [
        LockField::Name,
        LockField::Level,
        LockField::Race,
        LockField::Subrace,
        LockField::Class,
        LockField::Subclass,
        LockField::Background,
        LockField::Alignment,
        LockField::Gender,
        LockField::Abilities,
        LockField::Skills,
        LockField::Choices,
        LockField::Spells,
        LockField::Equipment,
        LockField::Currency,
        LockField::Notes,
        LockField::Biography,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSet(BTreeSet<LockField>);

impl LockSet {
    pub fn is_locked(&self, field: LockField) -> bool {
        self.0.contains(&field)
    }

    pub fn set(&mut self, field: LockField, locked: bool) {
        if locked {
            self.0.insert(field);
        } else {
            self.0.remove(&field);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = LockField> + '_ {
        self.0.iter().copied()
    }
}
