//! Derived-stats calculator
//!
//! Pure functions from a character's inputs and its resolved rules records
//! to combat and skill numbers. Unresolved race or class fall back to the
//! "no data" defaults: speed 30, no hit die, no spellcasting.

use std::collections::{BTreeMap, BTreeSet};

use crate::entities::{CharacterClass, Race};
use crate::types::{Ability, Skill};
use crate::value_objects::{AbilityScores, DerivedStats};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 20;
pub const DEFAULT_SPEED: u32 = 30;
pub const DEFAULT_HIT_DIE: u8 = 8;

/// Everything the calculator reads.
#[derive(Debug, Clone, Copy)]
pub struct StatInputs<'a> {
    pub level: u8,
    pub abilities: &'a AbilityScores,
    pub manual_hit_points: Option<i32>,
    pub class: Option<&'a CharacterClass>,
    pub race: Option<&'a Race>,
    /// Effective skill proficiencies.
    pub skills: &'a BTreeSet<Skill>,
    pub expertise: &'a BTreeSet<Skill>,
    pub saving_throws: &'a BTreeSet<Ability>,
}

pub fn clamp_level(level: i64) -> u8 {
    level.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u8
}

/// 2 at levels 1-4, rising by one every four levels to 6 at 17-20.
pub fn proficiency_bonus(level: u8) -> i32 {
    let level = level.clamp(MIN_LEVEL, MAX_LEVEL) as i32;
    2 + (level - 1) / 4
}

/// Maximum hit points, never below the character level.
///
/// Level 1 takes the full hit die; every later level adds the fixed average
/// (half the die plus one) with the CON modifier, at least 1 per level.
pub fn max_hit_points(level: u8, hit_die: Option<u8>, con_modifier: i32, manual: Option<i32>) -> i32 {
    let level = level.max(MIN_LEVEL) as i32;
    if let Some(manual) = manual {
        return manual.max(level);
    }
    let Some(hit_die) = hit_die else {
        return level;
    };
    let die = i32::from(if hit_die == 0 { DEFAULT_HIT_DIE } else { hit_die });
    let first = die + con_modifier;
    let per_level = (die / 2 + 1 + con_modifier).max(1);
    (first + per_level * (level - 1)).max(level)
}

/// Expertise doubles the proficiency bonus instead of stacking with it.
pub fn skill_bonus(modifier: i32, proficiency: i32, proficient: bool, expertise: bool) -> i32 {
    if expertise {
        modifier + proficiency * 2
    } else if proficient {
        modifier + proficiency
    } else {
        modifier
    }
}

pub fn derive_stats(inputs: &StatInputs<'_>) -> DerivedStats {
    let abilities = inputs.abilities;
    let proficiency = proficiency_bonus(inputs.level);
    let dex = abilities.modifier(Ability::Dex);
    let con = abilities.modifier(Ability::Con);

    let saving_throws = Ability::ALL
        .into_iter()
        .map(|ability| {
            let mut bonus = abilities.modifier(ability);
            if inputs.saving_throws.contains(&ability) {
                bonus += proficiency;
            }
            (ability, bonus)
        })
        .collect();

    let skills: BTreeMap<Skill, i32> = Skill::ALL
        .into_iter()
        .map(|skill| {
            let bonus = skill_bonus(
                abilities.modifier(skill.ability()),
                proficiency,
                inputs.skills.contains(&skill),
                inputs.expertise.contains(&skill),
            );
            (skill, bonus)
        })
        .collect();
    let passive_perception = 10
        + skills
            .get(&Skill::Perception)
            .copied()
            .unwrap_or_else(|| abilities.modifier(Ability::Wis));

    let hit_die = inputs.class.map(|c| c.hit_die);

    let spell_slots = inputs
        .class
        .and_then(|c| c.level(inputs.level))
        .and_then(|row| row.spellcasting.as_ref())
        .map(|casting| casting.positive_slots())
        .unwrap_or_default();

    let spellcasting_ability = inputs.class.and_then(CharacterClass::spellcasting_ability);
    let casting_modifier = spellcasting_ability.map(|ability| abilities.modifier(ability));

    DerivedStats {
        proficiency_bonus: proficiency,
        armor_class: 10 + dex,
        initiative: dex,
        speed: inputs.race.map(|r| r.speed).unwrap_or(DEFAULT_SPEED),
        max_hit_points: max_hit_points(inputs.level, hit_die, con, inputs.manual_hit_points),
        hit_die: hit_die.filter(|die| *die > 0).map(|die| format!("d{die}")),
        saving_throws,
        skills,
        passive_perception,
        spell_slots,
        spellcasting_ability,
        spell_save_dc: casting_modifier.map(|m| 8 + proficiency + m),
        spell_attack_bonus: casting_modifier.map(|m| proficiency + m),
    }
}
