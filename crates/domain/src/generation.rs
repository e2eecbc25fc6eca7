//! Static tables and pure scoring used by character generation.
//!
//! The random draws themselves happen in the engine; everything here is
//! deterministic so it can be tested without an RNG.

use crate::entities::Race;
use crate::entities::Subrace;
use crate::types::{Ability, Gender};
use crate::value_objects::AbilityTable;

/// The standard array, highest first.
pub const STANDARD_ARRAY: [i32; 6] = [15, 14, 13, 12, 10, 8];

/// Draw weights for levels 1 through 20.
pub const LEVEL_WEIGHTS: [u32; 20] = [20, 18, 16, 14, 12, 10, 9, 8, 7, 6, 5, 4, 4, 4, 3, 3, 2, 2, 2, 1];

/// Classes that prepare spells from their whole list each day.
pub const PREPARED_CASTER_CLASSES: [&str; 4] = ["cleric", "druid", "paladin", "wizard"];

pub fn is_prepared_caster(class: &str) -> bool {
    PREPARED_CASTER_CLASSES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(class))
}

// =============================================================================
// Ability priorities
// =============================================================================

/// Abilities a class cares about, most important first.
pub fn class_ability_priorities(class: &str) -> [Ability; 6] {
    use Ability::*;
    match class.to_lowercase().as_str() {
        "barbarian" => [Str, Con, Dex, Wis, Cha, Int],
        "bard" => [Cha, Dex, Con, Wis, Int, Str],
        "cleric" => [Wis, Con, Str, Dex, Int, Cha],
        "druid" => [Wis, Con, Dex, Int, Str, Cha],
        "fighter" => [Str, Con, Dex, Wis, Cha, Int],
        "monk" => [Dex, Wis, Con, Str, Int, Cha],
        "paladin" => [Str, Cha, Con, Wis, Dex, Int],
        "ranger" => [Dex, Wis, Con, Str, Int, Cha],
        "rogue" => [Dex, Int, Cha, Wis, Con, Str],
        "sorcerer" | "warlock" => [Cha, Con, Dex, Wis, Int, Str],
        "wizard" => [Int, Dex, Con, Wis, Cha, Str],
        _ => Ability::ALL,
    }
}

/// Hands out the standard array in priority order.
pub fn standard_array_scores(priorities: &[Ability; 6]) -> AbilityTable {
    let mut table = AbilityTable::filled(STANDARD_ARRAY[5]);
    for (ability, score) in priorities.iter().zip(STANDARD_ARRAY) {
        table[*ability] = score;
    }
    table
}

/// How well a set of racial bonuses suits a class.
///
/// Bonuses to the top priority count double, to the second one and a half
/// times, anything else three quarters. A race with nothing to offer still
/// scores 1 so it stays drawable.
pub fn bonus_fitness(
    bonuses: impl IntoIterator<Item = (Ability, i32)>,
    priorities: &[Ability; 6],
) -> f64 {
    let score: f64 = bonuses
        .into_iter()
        .map(|(ability, bonus)| {
            let weight = if ability == priorities[0] {
                2.0
            } else if ability == priorities[1] {
                1.5
            } else {
                0.75
            };
            f64::from(bonus) * weight
        })
        .sum();
    if score > 0.0 {
        score
    } else {
        1.0
    }
}

pub fn race_fitness(race: &Race, priorities: &[Ability; 6]) -> f64 {
    bonus_fitness(
        race.ability_bonuses.iter().map(|b| (b.ability, b.bonus)),
        priorities,
    )
}

pub fn subrace_fitness(subrace: &Subrace, priorities: &[Ability; 6]) -> f64 {
    bonus_fitness(
        subrace.ability_bonuses.iter().map(|b| (b.ability, b.bonus)),
        priorities,
    )
}

// =============================================================================
// Starting loadouts
// =============================================================================

/// A class's fixed starting kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loadout {
    pub armor: &'static [&'static str],
    pub weapons: &'static [&'static str],
    pub gear: &'static [&'static str],
    pub base_gold: u32,
    pub gold_per_level: u32,
}

impl Loadout {
    /// Armor, then weapons, then gear.
    pub fn items(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.armor
            .iter()
            .chain(self.weapons.iter())
            .chain(self.gear.iter())
            .copied()
    }

    pub fn gold_at_level(&self, level: u8) -> u32 {
        self.base_gold + u32::from(level.saturating_sub(1)) * self.gold_per_level
    }
}

const DEFAULT_LOADOUT: Loadout = Loadout {
    armor: &["leather-armor"],
    weapons: &["quarterstaff"],
    gear: &["explorers-pack"],
    base_gold: 40,
    gold_per_level: 20,
};

pub fn loadout_for(class: &str) -> Loadout {
    match class.to_lowercase().as_str() {
        "barbarian" => Loadout {
            armor: &["scale-mail"],
            weapons: &["greataxe", "handaxe", "handaxe"],
            gear: &["explorers-pack"],
            base_gold: 50,
            gold_per_level: 25,
        },
        "bard" => Loadout {
            armor: &["leather-armor"],
            weapons: &["rapier", "dagger"],
            gear: &["entertainers-pack", "lute"],
            base_gold: 45,
            gold_per_level: 20,
        },
        "cleric" => Loadout {
            armor: &["scale-mail", "shield"],
            weapons: &["mace"],
            gear: &["priests-pack", "holy-water-flask"],
            base_gold: 55,
            gold_per_level: 25,
        },
        "druid" => Loadout {
            armor: &["leather-armor", "shield"],
            weapons: &["scimitar", "quarterstaff"],
            gear: &["explorers-pack"],
            base_gold: 40,
            gold_per_level: 20,
        },
        "fighter" => Loadout {
            armor: &["chain-mail", "shield"],
            weapons: &["longsword", "longsword", "longbow", "arrow"],
            gear: &["dungeoneers-pack"],
            base_gold: 75,
            gold_per_level: 30,
        },
        "monk" => Loadout {
            armor: &[],
            weapons: &["shortsword", "dart", "dart", "dart", "dart"],
            gear: &["explorers-pack"],
            base_gold: 20,
            gold_per_level: 15,
        },
        "paladin" => Loadout {
            armor: &["chain-mail", "shield"],
            weapons: &["longsword", "warhammer"],
            gear: &["priests-pack", "holy-water-flask"],
            base_gold: 70,
            gold_per_level: 30,
        },
        "ranger" => Loadout {
            armor: &["scale-mail"],
            weapons: &["longbow", "arrow", "shortsword", "shortsword"],
            gear: &["explorers-pack"],
            base_gold: 60,
            gold_per_level: 25,
        },
        "rogue" => Loadout {
            armor: &["leather-armor"],
            weapons: &["rapier", "shortbow", "arrow"],
            gear: &["burglars-pack"],
            base_gold: 45,
            gold_per_level: 20,
        },
        "sorcerer" => Loadout {
            armor: &[],
            weapons: &["dagger", "dagger", "crossbow-light", "crossbow-bolt", "crossbow-bolt"],
            gear: &["explorers-pack", "crystal"],
            base_gold: 60,
            gold_per_level: 25,
        },
        "warlock" => Loadout {
            armor: &["leather-armor"],
            weapons: &["crossbow-light", "crossbow-bolt", "crossbow-bolt", "dagger", "dagger"],
            gear: &["scholars-pack"],
            base_gold: 65,
            gold_per_level: 25,
        },
        "wizard" => Loadout {
            armor: &[],
            weapons: &["quarterstaff", "dagger"],
            gear: &["scholars-pack", "spellbook", "crystal"],
            base_gold: 50,
            gold_per_level: 20,
        },
        _ => DEFAULT_LOADOUT,
    }
}

/// +1 from level 5, +2 from 11, +3 from 16.
pub fn magic_bonus_for_level(level: u8) -> u8 {
    if level >= 16 {
        3
    } else if level >= 11 {
        2
    } else if level >= 5 {
        1
    } else {
        0
    }
}

// =============================================================================
// Name tables
// =============================================================================

/// Given names by gender plus surnames for one race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameTable {
    pub male: &'static [&'static str],
    pub female: &'static [&'static str],
    pub surnames: &'static [&'static str],
}

impl NameTable {
    pub fn given_names(&self, gender: Option<Gender>) -> &'static [&'static str] {
        match gender {
            Some(Gender::Female) => self.female,
            _ => self.male,
        }
    }
}

const DEFAULT_NAMES: NameTable = NameTable {
    male: &["Rowan", "Galen", "Tobin", "Lucan", "Merrick"],
    female: &["Ayla", "Celia", "Daphne", "Lyra", "Mira"],
    surnames: &["Ashford", "Brightwood", "Fairwind", "Starling", "Waverly"],
};

fn race_name_table(key: &str) -> Option<NameTable> {
    let table = match key {
        "human" => NameTable {
            male: &["Alden", "Derrik", "Marcus", "Tristan", "Roland"],
            female: &["Elena", "Lysa", "Marian", "Seren", "Talia"],
            surnames: &["Blackwood", "Cavalier", "Harrow", "Rivers", "Thorne"],
        },
        "elf" => NameTable {
            male: &["Aelar", "Theren", "Varis", "Erevan", "Syllion"],
            female: &["Aeris", "Lia", "Naivara", "Sylwen", "Thia"],
            surnames: &["Evenwood", "Moonwhisper", "Nightbreeze", "Silvertree", "Windrunner"],
        },
        "dwarf" => NameTable {
            male: &["Baern", "Bruen", "Dorn", "Harbek", "Rurik"],
            female: &["Amber", "Eldeth", "Finellen", "Mardred", "Torbera"],
            surnames: &["Battlehammer", "Fireforge", "Ironfist", "Rockseeker", "Stonehelm"],
        },
        "halfling" => NameTable {
            male: &["Alton", "Cade", "Eldon", "Milo", "Wellby"],
            female: &["Bree", "Callie", "Lavinia", "Myria", "Seraphina"],
            surnames: &["Brushgather", "Goodbarrel", "Greenbottle", "Highhill", "Tealeaf"],
        },
        "dragonborn" => NameTable {
            male: &["Aryx", "Balasar", "Khagrax", "Rhogar", "Torinn"],
            female: &["Akra", "Kaida", "Mizra", "Sora", "Thyana"],
            surnames: &[
                "Clethtinthiallor",
                "Daardendrian",
                "Delmirev",
                "Kepeshkmolik",
                "Turnuroth",
            ],
        },
        "gnome" => NameTable {
            male: &["Alston", "Boddynock", "Dimble", "Finnan", "Orin"],
            female: &["Bimpnottin", "Ella", "Lilli", "Nissa", "Zanna"],
            surnames: &["Beren", "Daergel", "Folkor", "Murnig", "Nackle"],
        },
        "half-elf" => NameTable {
            male: &["Aeric", "Corin", "Laethan", "Syllas", "Theron"],
            female: &["Ara", "Elora", "Maia", "Rinn", "Sylia"],
            surnames: &["Amastacia", "Galanodel", "Ilphelkiir", "Siannodel", "Holimion"],
        },
        "half-orc" => NameTable {
            male: &["Dorn", "Grysh", "Krusk", "Mogar", "Thokk"],
            female: &["Arha", "Baggi", "Emen", "Sutha", "Yevelda"],
            surnames: &["Bonecrusher", "Ironhide", "Skullcleaver", "Stormcaller", "Thrash"],
        },
        "tiefling" => NameTable {
            male: &["Akmenos", "Damien", "Leucis", "Morthos", "Zephiros"],
            female: &["Akmena", "Beleth", "Kasdeya", "Orianna", "Zephra"],
            surnames: &["Fateborn", "Hellfire", "Nightbloom", "Runeweaver", "Shadowstep"],
        },
        _ => return None,
    };
    Some(table)
}

/// Lookup keys tried for a race id: the id itself, then its first and last
/// hyphenated parts (`hill-dwarf` falls back to `hill`, then `dwarf`).
pub fn race_lookup_keys(race: &str) -> Vec<String> {
    let race = race.trim().to_lowercase();
    let mut keys = vec![race.clone()];
    let parts: Vec<&str> = race.split('-').collect();
    if parts.len() > 1 {
        for part in [parts[0], parts[parts.len() - 1]] {
            if !keys.iter().any(|k| k == part) {
                keys.push(part.to_string());
            }
        }
    }
    keys
}

pub fn name_table_for(race: Option<&str>) -> NameTable {
    race.map(race_lookup_keys)
        .unwrap_or_default()
        .iter()
        .find_map(|key| race_name_table(key))
        .unwrap_or(DEFAULT_NAMES)
}
