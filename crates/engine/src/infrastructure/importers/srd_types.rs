//! Type definitions for the 5e-database SRD JSON format.
//!
//! These types mirror the `5e-SRD-*.json` files one-to-one. They are used for
//! deserialization only and then converted to the domain records; anything
//! the character builder does not reason about is left out.

use serde::Deserialize;

/// `{ "index": ..., "name": ..., "url": ... }` pointer used all over the SRD.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SrdReference {
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SrdReference {
    /// The lowercase index, falling back to the last path segment of the url.
    pub fn resolved_index(&self) -> Option<String> {
        let from_url = || {
            self.url
                .as_deref()
                .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
                .map(str::to_string)
        };
        self.index
            .clone()
            .or_else(from_url)
            .map(|index| index.trim().to_lowercase())
            .filter(|index| !index.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct SrdAbilityBonus {
    pub ability_score: SrdReference,
    #[serde(default)]
    pub bonus: i32,
}

/// `{ "desc", "choose", "type", "from": { ... } }`
#[derive(Debug, Deserialize)]
pub struct SrdChoice {
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub choose: u32,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub from: Option<SrdOptionSet>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "option_set_type", rename_all = "snake_case")]
pub enum SrdOptionSet {
    OptionsArray {
        #[serde(default)]
        options: Vec<SrdOption>,
    },
    ResourceList {
        #[serde(default)]
        resource_list_url: String,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "option_type", rename_all = "snake_case")]
pub enum SrdOption {
    Reference {
        item: SrdReference,
    },
    CountedReference {
        of: SrdReference,
    },
    Choice {
        choice: Box<SrdChoice>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub struct SrdRace {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub speed: Option<u32>,
    #[serde(default)]
    pub ability_bonuses: Vec<SrdAbilityBonus>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub starting_proficiencies: Vec<SrdReference>,
    #[serde(default)]
    pub starting_proficiency_options: Option<SrdChoice>,
    #[serde(default)]
    pub languages: Vec<SrdReference>,
    #[serde(default)]
    pub language_options: Option<SrdChoice>,
    #[serde(default)]
    pub traits: Vec<SrdReference>,
    #[serde(default)]
    pub subraces: Vec<SrdReference>,
}

#[derive(Debug, Deserialize)]
pub struct SrdSubrace {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub race: Option<SrdReference>,
    #[serde(default)]
    pub ability_bonuses: Vec<SrdAbilityBonus>,
    #[serde(default)]
    pub starting_proficiencies: Vec<SrdReference>,
    #[serde(default)]
    pub languages: Vec<SrdReference>,
    #[serde(default)]
    pub language_options: Option<SrdChoice>,
    #[serde(default)]
    pub racial_traits: Vec<SrdReference>,
}

#[derive(Debug, Deserialize)]
pub struct SrdClass {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub hit_die: u8,
    #[serde(default)]
    pub proficiency_choices: Vec<SrdChoice>,
    #[serde(default)]
    pub proficiencies: Vec<SrdReference>,
    #[serde(default)]
    pub saving_throws: Vec<SrdReference>,
    #[serde(default)]
    pub spellcasting: Option<SrdClassSpellcasting>,
}

#[derive(Debug, Deserialize)]
pub struct SrdClassSpellcasting {
    #[serde(default)]
    pub level: Option<u8>,
    pub spellcasting_ability: SrdReference,
}

#[derive(Debug, Deserialize)]
pub struct SrdSubclass {
    pub index: String,
    pub name: String,
    pub class: SrdReference,
    #[serde(default)]
    pub subclass_flavor: Option<String>,
}

/// One row of `5e-SRD-Levels.json`. Rows carrying a `subclass` describe
/// subclass features rather than the base class progression.
#[derive(Debug, Deserialize)]
pub struct SrdLevel {
    pub level: u8,
    #[serde(default)]
    pub ability_score_bonuses: Option<u8>,
    #[serde(default)]
    pub prof_bonus: Option<i32>,
    #[serde(default)]
    pub features: Vec<SrdReference>,
    #[serde(default)]
    pub spellcasting: Option<SrdLevelSpellcasting>,
    pub class: SrdReference,
    #[serde(default)]
    pub subclass: Option<SrdReference>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SrdLevelSpellcasting {
    #[serde(default)]
    pub cantrips_known: Option<u8>,
    #[serde(default)]
    pub spells_known: Option<u8>,
    #[serde(default)]
    pub spell_slots_level_1: u8,
    #[serde(default)]
    pub spell_slots_level_2: u8,
    #[serde(default)]
    pub spell_slots_level_3: u8,
    #[serde(default)]
    pub spell_slots_level_4: u8,
    #[serde(default)]
    pub spell_slots_level_5: u8,
    #[serde(default)]
    pub spell_slots_level_6: u8,
    #[serde(default)]
    pub spell_slots_level_7: u8,
    #[serde(default)]
    pub spell_slots_level_8: u8,
    #[serde(default)]
    pub spell_slots_level_9: u8,
}

impl SrdLevelSpellcasting {
    pub fn slots(&self) -> [u8; 9] {
        [
            self.spell_slots_level_1,
            self.spell_slots_level_2,
            self.spell_slots_level_3,
            self.spell_slots_level_4,
            self.spell_slots_level_5,
            self.spell_slots_level_6,
            self.spell_slots_level_7,
            self.spell_slots_level_8,
            self.spell_slots_level_9,
        ]
    }
}

#[derive(Debug, Deserialize)]
pub struct SrdBackground {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub starting_proficiencies: Vec<SrdReference>,
    #[serde(default, alias = "starting_proficiencies_options")]
    pub starting_proficiency_options: Option<SrdChoice>,
    #[serde(default)]
    pub language_options: Option<SrdChoice>,
    #[serde(default)]
    pub feature: Option<SrdFeature>,
}

#[derive(Debug, Deserialize)]
pub struct SrdFeature {
    pub name: String,
    #[serde(default)]
    pub desc: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SrdSpell {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub school: Option<SrdReference>,
    #[serde(default)]
    pub classes: Vec<SrdReference>,
    #[serde(default)]
    pub subclasses: Vec<SrdReference>,
}

#[derive(Debug, Deserialize)]
pub struct SrdEquipment {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub equipment_category: Option<SrdReference>,
    #[serde(default)]
    pub weapon_category: Option<String>,
    #[serde(default)]
    pub armor_category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SrdProficiency {
    pub index: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reference: Option<SrdReference>,
}

#[derive(Debug, Deserialize)]
pub struct SrdLanguage {
    pub index: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SrdAlignment {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
}
