//! Test fixtures: a small SRD dataset in the 5e-database JSON shape.
//!
//! The files are written to a temporary directory and read back through the
//! real importer, so every test that uses [`sample_dataset`] also exercises
//! the import path.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::sample_dataset;
//!
//! #[test]
//! fn test_dwarves_are_slow() {
//!     let data = sample_dataset();
//!     assert_eq!(data.race("dwarf").unwrap().speed, 25);
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use charsmith_domain::Compendium;

use crate::infrastructure::importers::{
    SrdImporter, ALIGNMENTS_FILE, BACKGROUNDS_FILE, CLASSES_FILE, EQUIPMENT_FILE, LANGUAGES_FILE,
    LEVELS_FILE, PROFICIENCIES_FILE, RACES_FILE, SPELLS_FILE, SUBCLASSES_FILE, SUBRACES_FILE,
};

// =============================================================================
// Fixture Loading
// =============================================================================

/// Write one SRD resource file.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_srd_file(dir: &Path, file: &str, value: &Value) {
    let path = dir.join(file);
    let content = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| panic!("Failed to serialize fixture '{file}': {e}"));
    std::fs::write(&path, content)
        .unwrap_or_else(|e| panic!("Failed to write fixture '{}': {}", path.display(), e));
}

/// A temporary directory holding the full sample dataset. Keep the returned
/// handle alive for as long as the files are needed.
pub fn srd_dataset_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path();
    write_srd_file(path, LANGUAGES_FILE, &languages());
    write_srd_file(path, ALIGNMENTS_FILE, &alignments());
    write_srd_file(path, PROFICIENCIES_FILE, &proficiencies());
    write_srd_file(path, EQUIPMENT_FILE, &equipment());
    write_srd_file(path, RACES_FILE, &races());
    write_srd_file(path, SUBRACES_FILE, &subraces());
    write_srd_file(path, CLASSES_FILE, &classes());
    write_srd_file(path, SUBCLASSES_FILE, &subclasses());
    write_srd_file(path, LEVELS_FILE, &levels());
    write_srd_file(path, BACKGROUNDS_FILE, &backgrounds());
    write_srd_file(path, SPELLS_FILE, &spells());
    dir
}

/// The sample dataset, imported and ready to share.
pub fn sample_dataset() -> Arc<Compendium> {
    let dir = srd_dataset_dir();
    SrdImporter::new(dir.path())
        .load_shared()
        .expect("Sample SRD dataset should import")
}

// =============================================================================
// JSON builders
// =============================================================================

fn reference(kind: &str, index: &str, name: &str) -> Value {
    json!({ "index": index, "name": name, "url": format!("/api/{kind}/{index}") })
}

fn ability(index: &str) -> Value {
    reference("ability-scores", index, &index.to_uppercase())
}

fn bonus(index: &str, amount: i32) -> Value {
    json!({ "ability_score": ability(index), "bonus": amount })
}

fn prof(index: &str, name: &str) -> Value {
    reference("proficiencies", index, name)
}

fn language(index: &str, name: &str) -> Value {
    reference("languages", index, name)
}

fn options(choose: u32, kind: &str, items: Vec<Value>) -> Value {
    json!({
        "choose": choose,
        "type": kind,
        "from": { "option_set_type": "options_array", "options": items }
    })
}

fn option(item: Value) -> Value {
    json!({ "option_type": "reference", "item": item })
}

fn any_language(choose: u32) -> Value {
    json!({
        "choose": choose,
        "type": "languages",
        "from": { "option_set_type": "resource_list", "resource_list_url": "/api/languages" }
    })
}

fn skill_choice(choose: u32, skills: &[(&str, &str)]) -> Value {
    options(
        choose,
        "proficiencies",
        skills
            .iter()
            .map(|(index, name)| option(prof(&format!("skill-{index}"), &format!("Skill: {name}"))))
            .collect(),
    )
}

// =============================================================================
// Resources
// =============================================================================

fn languages() -> Value {
    json!([
        { "index": "common", "name": "Common", "type": "Standard" },
        { "index": "dwarvish", "name": "Dwarvish", "type": "Standard" },
        { "index": "elvish", "name": "Elvish", "type": "Standard" },
        { "index": "giant", "name": "Giant", "type": "Standard" },
        { "index": "gnomish", "name": "Gnomish", "type": "Standard" },
    ])
}

fn alignments() -> Value {
    json!([
        { "index": "lawful-good", "name": "Lawful Good", "abbreviation": "LG" },
        { "index": "neutral", "name": "Neutral", "abbreviation": "N" },
        { "index": "chaotic-evil", "name": "Chaotic Evil", "abbreviation": "CE" },
    ])
}

fn proficiencies() -> Value {
    let skills = [
        ("acrobatics", "Acrobatics"),
        ("animal-handling", "Animal Handling"),
        ("arcana", "Arcana"),
        ("athletics", "Athletics"),
        ("history", "History"),
        ("insight", "Insight"),
        ("intimidation", "Intimidation"),
        ("investigation", "Investigation"),
        ("medicine", "Medicine"),
        ("perception", "Perception"),
        ("religion", "Religion"),
        ("stealth", "Stealth"),
        ("survival", "Survival"),
    ];
    let mut entries: Vec<Value> = skills
        .iter()
        .map(|(index, name)| {
            json!({
                "index": format!("skill-{index}"),
                "name": format!("Skill: {name}"),
                "type": "Skills",
                "reference": reference("skills", index, name)
            })
        })
        .collect();
    for ability_index in ["str", "dex", "con", "int", "wis", "cha"] {
        entries.push(json!({
            "index": format!("saving-throw-{ability_index}"),
            "name": format!("Saving Throw: {}", ability_index.to_uppercase()),
            "type": "Saving Throws",
            "reference": ability(ability_index)
        }));
    }
    entries.extend([
        json!({ "index": "all-armor", "name": "All armor", "type": "Armor" }),
        json!({ "index": "shields", "name": "Shields", "type": "Armor" }),
        json!({ "index": "simple-weapons", "name": "Simple Weapons", "type": "Weapons" }),
        json!({ "index": "martial-weapons", "name": "Martial Weapons", "type": "Weapons" }),
        json!({ "index": "daggers", "name": "Daggers", "type": "Weapons" }),
        json!({ "index": "quarterstaffs", "name": "Quarterstaffs", "type": "Weapons" }),
        json!({ "index": "battleaxes", "name": "Battleaxes", "type": "Weapons" }),
        json!({ "index": "smiths-tools", "name": "Smith's Tools", "type": "Artisan's Tools" }),
        json!({ "index": "brewers-supplies", "name": "Brewer's Supplies", "type": "Artisan's Tools" }),
        json!({ "index": "thieves-tools", "name": "Thieves' Tools", "type": "Other Tools" }),
        json!({ "index": "dice-set", "name": "Dice Set", "type": "Gaming Sets" }),
    ]);
    Value::Array(entries)
}

fn equipment() -> Value {
    let weapon = || reference("equipment-categories", "weapon", "Weapon");
    let armor = || reference("equipment-categories", "armor", "Armor");
    let gear = || reference("equipment-categories", "adventuring-gear", "Adventuring Gear");
    json!([
        { "index": "chain-mail", "name": "Chain Mail", "equipment_category": armor(), "armor_category": "Heavy" },
        { "index": "shield", "name": "Shield", "equipment_category": armor(), "armor_category": "Shield" },
        { "index": "longsword", "name": "Longsword", "equipment_category": weapon(), "weapon_category": "Martial" },
        { "index": "longbow", "name": "Longbow", "equipment_category": weapon(), "weapon_category": "Martial" },
        { "index": "quarterstaff", "name": "Quarterstaff", "equipment_category": weapon(), "weapon_category": "Simple" },
        { "index": "dagger", "name": "Dagger", "equipment_category": weapon(), "weapon_category": "Simple" },
        { "index": "spellbook", "name": "Spellbook", "equipment_category": gear() },
    ])
}

fn races() -> Value {
    let dwarf_tools = json!({
        "choose": 1,
        "type": "proficiencies",
        "from": {
            "option_set_type": "options_array",
            "options": [
                option(prof("smiths-tools", "Smith's Tools")),
                {
                    "option_type": "choice",
                    "choice": options(1, "proficiencies", vec![
                        option(prof("brewers-supplies", "Brewer's Supplies")),
                        option(prof("thieves-tools", "Thieves' Tools")),
                    ])
                }
            ]
        }
    });
    json!([
        {
            "index": "dwarf",
            "name": "Dwarf",
            "speed": 25,
            "ability_bonuses": [bonus("con", 2)],
            "size": "Medium",
            "starting_proficiencies": [prof("battleaxes", "Battleaxes")],
            "starting_proficiency_options": dwarf_tools,
            "languages": [language("common", "Common"), language("dwarvish", "Dwarvish")],
            "traits": [reference("traits", "darkvision", "Darkvision")],
            "subraces": [reference("subraces", "hill-dwarf", "Hill Dwarf")]
        },
        {
            "index": "elf",
            "name": "Elf",
            "speed": 30,
            "ability_bonuses": [bonus("dex", 2)],
            "size": "Medium",
            "starting_proficiencies": [prof("skill-perception", "Skill: Perception")],
            "languages": [language("common", "Common"), language("elvish", "Elvish")],
            "traits": [reference("traits", "darkvision", "Darkvision")],
            "subraces": [reference("subraces", "high-elf", "High Elf")]
        },
        {
            "index": "human",
            "name": "Human",
            "speed": 30,
            "ability_bonuses": [
                bonus("str", 1), bonus("dex", 1), bonus("con", 1),
                bonus("int", 1), bonus("wis", 1), bonus("cha", 1)
            ],
            "size": "Medium",
            "languages": [language("common", "Common")],
            "language_options": any_language(1),
            "subraces": []
        },
    ])
}

fn subraces() -> Value {
    json!([
        {
            "index": "hill-dwarf",
            "name": "Hill Dwarf",
            "race": reference("races", "dwarf", "Dwarf"),
            "ability_bonuses": [bonus("wis", 1)],
            "racial_traits": [reference("traits", "dwarven-toughness", "Dwarven Toughness")]
        },
        {
            "index": "high-elf",
            "name": "High Elf",
            "race": reference("races", "elf", "Elf"),
            "ability_bonuses": [bonus("int", 1)],
            "language_options": options(1, "languages", vec![
                option(language("dwarvish", "Dwarvish")),
                option(language("giant", "Giant")),
                option(language("gnomish", "Gnomish")),
            ])
        },
    ])
}

fn classes() -> Value {
    json!([
        {
            "index": "fighter",
            "name": "Fighter",
            "hit_die": 10,
            "proficiency_choices": [skill_choice(2, &[
                ("acrobatics", "Acrobatics"),
                ("animal-handling", "Animal Handling"),
                ("athletics", "Athletics"),
                ("history", "History"),
                ("insight", "Insight"),
                ("intimidation", "Intimidation"),
                ("perception", "Perception"),
                ("survival", "Survival"),
            ])],
            "proficiencies": [
                prof("all-armor", "All armor"),
                prof("shields", "Shields"),
                prof("simple-weapons", "Simple Weapons"),
                prof("martial-weapons", "Martial Weapons"),
                prof("saving-throw-str", "Saving Throw: STR"),
                prof("saving-throw-con", "Saving Throw: CON"),
            ],
            "saving_throws": [ability("str"), ability("con")]
        },
        {
            "index": "wizard",
            "name": "Wizard",
            "hit_die": 6,
            "proficiency_choices": [skill_choice(2, &[
                ("arcana", "Arcana"),
                ("history", "History"),
                ("insight", "Insight"),
                ("investigation", "Investigation"),
                ("medicine", "Medicine"),
                ("religion", "Religion"),
            ])],
            "proficiencies": [
                prof("daggers", "Daggers"),
                prof("quarterstaffs", "Quarterstaffs"),
                prof("saving-throw-int", "Saving Throw: INT"),
                prof("saving-throw-wis", "Saving Throw: WIS"),
            ],
            "saving_throws": [ability("int"), ability("wis")],
            "spellcasting": { "level": 1, "spellcasting_ability": ability("int") }
        },
    ])
}

fn subclasses() -> Value {
    json!([
        {
            "index": "champion",
            "name": "Champion",
            "class": reference("classes", "fighter", "Fighter"),
            "subclass_flavor": "Martial Archetype"
        },
        {
            "index": "evocation",
            "name": "Evocation",
            "class": reference("classes", "wizard", "Wizard"),
            "subclass_flavor": "Arcane Tradition"
        },
    ])
}

fn levels() -> Value {
    let feature = |index: &str, name: &str| reference("features", index, name);
    let fighter = reference("classes", "fighter", "Fighter");
    let wizard = reference("classes", "wizard", "Wizard");
    let casting = |cantrips: u8, slots: &[u8]| {
        let mut value = json!({ "cantrips_known": cantrips });
        for (position, count) in slots.iter().enumerate() {
            value[format!("spell_slots_level_{}", position + 1)] = json!(count);
        }
        value
    };

    json!([
        { "level": 1, "prof_bonus": 2, "class": fighter,
          "features": [feature("second-wind", "Second Wind"), feature("fighting-style", "Fighting Style")] },
        { "level": 2, "prof_bonus": 2, "class": fighter,
          "features": [feature("action-surge", "Action Surge")] },
        { "level": 3, "prof_bonus": 2, "class": fighter,
          "features": [feature("martial-archetype", "Martial Archetype")] },
        { "level": 4, "prof_bonus": 2, "ability_score_bonuses": 1, "class": fighter,
          "features": [feature("ability-score-improvement", "Ability Score Improvement")] },
        { "level": 5, "prof_bonus": 3, "class": fighter,
          "features": [feature("extra-attack", "Extra Attack")] },
        { "level": 3, "class": fighter, "subclass": reference("subclasses", "champion", "Champion"),
          "features": [feature("improved-critical", "Improved Critical")] },

        { "level": 1, "prof_bonus": 2, "class": wizard, "spellcasting": casting(3, &[2]),
          "features": [feature("arcane-recovery", "Arcane Recovery")] },
        { "level": 2, "prof_bonus": 2, "class": wizard, "spellcasting": casting(3, &[3]),
          "features": [] },
        { "level": 3, "prof_bonus": 2, "class": wizard, "spellcasting": casting(3, &[4, 2]),
          "features": [] },
        { "level": 4, "prof_bonus": 2, "ability_score_bonuses": 1, "class": wizard,
          "spellcasting": casting(4, &[4, 3]),
          "features": [feature("ability-score-improvement", "Ability Score Improvement")] },
        { "level": 5, "prof_bonus": 3, "class": wizard, "spellcasting": casting(4, &[4, 3, 2]),
          "features": [] },
        { "level": 2, "class": wizard, "subclass": reference("subclasses", "evocation", "Evocation"),
          "features": [feature("evocation-savant", "Evocation Savant")] },
    ])
}

fn backgrounds() -> Value {
    json!([
        {
            "index": "acolyte",
            "name": "Acolyte",
            "starting_proficiencies": [
                prof("skill-insight", "Skill: Insight"),
                prof("skill-religion", "Skill: Religion"),
            ],
            "language_options": any_language(2),
            "feature": {
                "name": "Shelter of the Faithful",
                "desc": ["You command the respect of those who share your faith."]
            }
        },
        {
            "index": "soldier",
            "name": "Soldier",
            "starting_proficiencies": [
                prof("skill-athletics", "Skill: Athletics"),
                prof("skill-intimidation", "Skill: Intimidation"),
                prof("dice-set", "Dice Set"),
            ],
            "feature": { "name": "Military Rank", "desc": [] }
        },
    ])
}

fn spells() -> Value {
    let spell = |index: &str, name: &str, level: u8, school: &str, class: &str| {
        json!({
            "index": index,
            "name": name,
            "level": level,
            "school": reference("magic-schools", &school.to_lowercase(), school),
            "classes": [reference("classes", class, class)]
        })
    };
    json!([
        spell("fire-bolt", "Fire Bolt", 0, "Evocation", "wizard"),
        spell("light", "Light", 0, "Evocation", "wizard"),
        spell("mage-hand", "Mage Hand", 0, "Conjuration", "wizard"),
        spell("ray-of-frost", "Ray of Frost", 0, "Evocation", "wizard"),
        spell("burning-hands", "Burning Hands", 1, "Evocation", "wizard"),
        spell("mage-armor", "Mage Armor", 1, "Abjuration", "wizard"),
        spell("magic-missile", "Magic Missile", 1, "Evocation", "wizard"),
        spell("sleep", "Sleep", 1, "Enchantment", "wizard"),
        spell("misty-step", "Misty Step", 2, "Conjuration", "wizard"),
        spell("scorching-ray", "Scorching Ray", 2, "Evocation", "wizard"),
        spell("fireball", "Fireball", 3, "Evocation", "wizard"),
        spell("cure-wounds", "Cure Wounds", 1, "Evocation", "cleric"),
    ])
}
