use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Ability, Skill};

/// Numbers computed from a draft. Only the rules calculator produces these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub proficiency_bonus: i32,
    pub armor_class: i32,
    pub initiative: i32,
    pub speed: u32,
    pub max_hit_points: i32,
    /// "d8" style label, absent without a class.
    pub hit_die: Option<String>,
    pub saving_throws: BTreeMap<Ability, i32>,
    pub skills: BTreeMap<Skill, i32>,
    pub passive_perception: i32,
    /// Slot counts keyed by spell level, positive entries only.
    pub spell_slots: BTreeMap<u8, u8>,
    pub spellcasting_ability: Option<Ability>,
    pub spell_save_dc: Option<i32>,
    pub spell_attack_bonus: Option<i32>,
}

impl Default for DerivedStats {
    fn default() -> Self {
        Self {
            proficiency_bonus: 2,
            armor_class: 10,
            initiative: 0,
            speed: 30,
            max_hit_points: 1,
            hit_die: None,
            saving_throws: Ability::ALL.into_iter().map(|a| (a, 0)).collect(),
            skills: Skill::ALL.into_iter().map(|s| (s, 0)).collect(),
            passive_perception: 10,
            spell_slots: BTreeMap::new(),
            spellcasting_ability: None,
            spell_save_dc: None,
            spell_attack_bonus: None,
        }
    }
}
