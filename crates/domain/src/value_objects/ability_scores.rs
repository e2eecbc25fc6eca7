//! Ability scores with their layered bonuses.
//!
//! A total is `base + racial + subrace + manual`. Only the base and manual
//! layers are player-editable; the racial and subrace layers are rewritten
//! from the rules records on every refresh.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::types::Ability;

pub const MIN_ABILITY_SCORE: i32 = 1;
pub const MAX_ABILITY_SCORE: i32 = 30;
pub const DEFAULT_ABILITY_SCORE: i32 = 10;
pub const MAX_MANUAL_BONUS: i32 = 10;

/// Modifier for an ability total: floor((total - 10) / 2).
pub fn ability_modifier(total: i32) -> i32 {
    (total - 10).div_euclid(2)
}

/// One value per ability, indexed by [`Ability`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityTable([i32; 6]);

impl AbilityTable {
    pub fn filled(value: i32) -> Self {
        Self([value; 6])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::ALL.into_iter().map(|a| (a, self[a]))
    }
}

impl Index<Ability> for AbilityTable {
    type Output = i32;

    fn index(&self, ability: Ability) -> &i32 {
        &self.0[ability.position()]
    }
}

impl IndexMut<Ability> for AbilityTable {
    fn index_mut(&mut self, ability: Ability) -> &mut i32 {
        &mut self.0[ability.position()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub base: AbilityTable,
    pub racial: AbilityTable,
    pub subrace: AbilityTable,
    pub manual: AbilityTable,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            base: AbilityTable::filled(DEFAULT_ABILITY_SCORE),
            racial: AbilityTable::default(),
            subrace: AbilityTable::default(),
            manual: AbilityTable::default(),
        }
    }
}

impl AbilityScores {
    pub fn total(&self, ability: Ability) -> i32 {
        self.base[ability] + self.racial[ability] + self.subrace[ability] + self.manual[ability]
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.total(ability))
    }

    pub fn breakdown(&self, ability: Ability) -> AbilityBreakdown {
        let total = self.total(ability);
        AbilityBreakdown {
            ability,
            base: self.base[ability],
            racial: self.racial[ability],
            subrace: self.subrace[ability],
            manual: self.manual[ability],
            total,
            modifier: ability_modifier(total),
        }
    }
}

/// One row of the ability table shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityBreakdown {
    pub ability: Ability,
    pub base: i32,
    pub racial: i32,
    pub subrace: i32,
    pub manual: i32,
    pub total: i32,
    pub modifier: i32,
}
