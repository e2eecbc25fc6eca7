//! 5e-database SRD importer
//!
//! Loads the `5e-SRD-*.json` resource files from a directory and converts
//! them into the typed records of a [`Compendium`]. Shape irregularities in
//! individual records are logged and skipped; only missing required files,
//! I/O failures and malformed JSON abort the import.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use charsmith_domain::{
    Ability, AbilityBonus, Alignment, Background, BackgroundFeature, CharacterClass, ChoiceBlock,
    ChoiceEntry, ClassLevel, Compendium, Equipment, Language, LevelSpellcasting, Proficiency,
    ProficiencyType, Race, Reference, Spell, Spellcasting, Subclass, Subrace,
};

use super::srd_types::{
    SrdAbilityBonus, SrdAlignment, SrdBackground, SrdChoice, SrdClass, SrdEquipment, SrdLanguage,
    SrdLevel, SrdOption, SrdOptionSet, SrdProficiency, SrdRace, SrdReference, SrdSpell,
    SrdSubclass, SrdSubrace,
};

pub const RACES_FILE: &str = "5e-SRD-Races.json";
pub const SUBRACES_FILE: &str = "5e-SRD-Subraces.json";
pub const CLASSES_FILE: &str = "5e-SRD-Classes.json";
pub const SUBCLASSES_FILE: &str = "5e-SRD-Subclasses.json";
pub const LEVELS_FILE: &str = "5e-SRD-Levels.json";
pub const BACKGROUNDS_FILE: &str = "5e-SRD-Backgrounds.json";
pub const SPELLS_FILE: &str = "5e-SRD-Spells.json";
pub const EQUIPMENT_FILE: &str = "5e-SRD-Equipment.json";
pub const PROFICIENCIES_FILE: &str = "5e-SRD-Proficiencies.json";
pub const LANGUAGES_FILE: &str = "5e-SRD-Languages.json";
pub const ALIGNMENTS_FILE: &str = "5e-SRD-Alignments.json";

/// Resource list url that stands for "any language".
const LANGUAGES_RESOURCE: &str = "/api/languages";

/// Errors that can occur during import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Data file not found: {0}")]
    DataFileNotFound(PathBuf),
    #[error("SRD data directory not found: {0}")]
    InvalidDataDirectory(PathBuf),
}

/// Importer for the 5e-database SRD JSON files.
pub struct SrdImporter {
    data_path: PathBuf,
}

impl SrdImporter {
    /// Create a new importer pointing to a directory of `5e-SRD-*.json` files,
    /// e.g. `5e-database/src/2014`.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    pub fn validate_path(&self) -> bool {
        self.data_path.is_dir() && self.data_path.join(RACES_FILE).exists()
    }

    /// Import every supported resource into a compendium.
    pub fn load(&self) -> Result<Compendium, ImportError> {
        if !self.data_path.is_dir() {
            return Err(ImportError::InvalidDataDirectory(self.data_path.clone()));
        }

        let languages = self.import_languages()?;
        let proficiencies = self.import_proficiencies()?;
        let races = self.import_races(&languages)?;
        let classes = self.import_classes(&languages)?;
        let backgrounds = self.import_backgrounds(&languages)?;
        let spells = self.import_spells()?;
        let equipment = self.import_equipment()?;
        let alignments = self.import_alignments()?;

        info!(
            path = %self.data_path.display(),
            races = races.len(),
            classes = classes.len(),
            backgrounds = backgrounds.len(),
            spells = spells.len(),
            equipment = equipment.len(),
            proficiencies = proficiencies.len(),
            languages = languages.len(),
            "Loaded SRD dataset"
        );

        Ok(Compendium::builder()
            .races(races)
            .classes(classes)
            .backgrounds(backgrounds)
            .spells(spells)
            .equipment_items(equipment)
            .proficiencies(proficiencies)
            .languages(languages)
            .alignments(alignments)
            .build())
    }

    /// Import once and hand out a shareable read-only handle.
    pub fn load_shared(&self) -> Result<Arc<Compendium>, ImportError> {
        self.load().map(Arc::new)
    }

    pub fn import_races(&self, languages: &[Language]) -> Result<Vec<Race>, ImportError> {
        let raw_races: Vec<SrdRace> = self.read_required(RACES_FILE)?;
        let raw_subraces: Vec<SrdSubrace> = self.read_optional(SUBRACES_FILE)?;

        let mut subraces: Vec<(Option<String>, Subrace)> = raw_subraces
            .into_iter()
            .filter_map(|raw| {
                let parent = raw.race.as_ref().and_then(SrdReference::resolved_index);
                convert_subrace(raw, languages).map(|subrace| (parent, subrace))
            })
            .collect();

        let mut races = Vec::with_capacity(raw_races.len());
        for raw in raw_races {
            let listed: Vec<String> = raw
                .subraces
                .iter()
                .filter_map(SrdReference::resolved_index)
                .collect();
            let Some(mut race) = convert_race(raw, languages) else {
                continue;
            };
            let mut remaining = Vec::with_capacity(subraces.len());
            for (parent, mut subrace) in subraces {
                let belongs = listed.contains(&subrace.index)
                    || parent.as_deref() == Some(race.index.as_str());
                if belongs {
                    subrace.race = race.index.clone();
                    race.subraces.push(subrace);
                } else {
                    remaining.push((parent, subrace));
                }
            }
            subraces = remaining;
            races.push(race);
        }

        for (parent, subrace) in &subraces {
            warn!(subrace = %subrace.index, parent = ?parent, "Skipping subrace without a loaded race");
        }
        Ok(races)
    }

    /// Classes with their level progression and subclasses attached.
    pub fn import_classes(&self, languages: &[Language]) -> Result<Vec<CharacterClass>, ImportError> {
        let raw_classes: Vec<SrdClass> = self.read_required(CLASSES_FILE)?;
        let raw_subclasses: Vec<SrdSubclass> = self.read_optional(SUBCLASSES_FILE)?;
        let raw_levels: Vec<SrdLevel> = self.read_optional(LEVELS_FILE)?;

        let mut class_levels: HashMap<String, BTreeMap<u8, ClassLevel>> = HashMap::new();
        let mut subclass_features: HashMap<String, BTreeMap<u8, Vec<Reference>>> = HashMap::new();
        for raw in raw_levels {
            let Some(class_index) = raw.class.resolved_index() else {
                warn!(level = raw.level, "Skipping level row without a class");
                continue;
            };
            match raw.subclass.as_ref().and_then(SrdReference::resolved_index) {
                Some(subclass_index) => {
                    subclass_features
                        .entry(subclass_index)
                        .or_default()
                        .insert(raw.level, convert_references(&raw.features));
                }
                None => {
                    let level = convert_level(raw);
                    class_levels
                        .entry(class_index)
                        .or_default()
                        .insert(level.level, level);
                }
            }
        }

        let mut subclasses: HashMap<String, Vec<Subclass>> = HashMap::new();
        for raw in raw_subclasses {
            let Some(class_index) = raw.class.resolved_index() else {
                warn!(subclass = %raw.index, "Skipping subclass without a class");
                continue;
            };
            let index = raw.index.trim().to_lowercase();
            let mut subclass = Subclass::new(index.clone(), raw.name, class_index.clone());
            subclass.flavor = raw.subclass_flavor;
            subclass.features_by_level = subclass_features.remove(&index).unwrap_or_default();
            subclasses.entry(class_index).or_default().push(subclass);
        }

        Ok(raw_classes
            .into_iter()
            .filter_map(|raw| {
                let index = raw.index.trim().to_lowercase();
                let levels = class_levels.remove(&index).unwrap_or_default();
                let subclasses = subclasses.remove(&index).unwrap_or_default();
                convert_class(raw, languages).map(|mut class| {
                    class.levels = levels;
                    class.subclasses = subclasses;
                    class
                })
            })
            .collect())
    }

    pub fn import_backgrounds(&self, languages: &[Language]) -> Result<Vec<Background>, ImportError> {
        let raw: Vec<SrdBackground> = self.read_optional(BACKGROUNDS_FILE)?;
        Ok(raw
            .into_iter()
            .filter_map(|raw| convert_background(raw, languages))
            .collect())
    }

    pub fn import_spells(&self) -> Result<Vec<Spell>, ImportError> {
        let raw: Vec<SrdSpell> = self.read_optional(SPELLS_FILE)?;
        Ok(raw.into_iter().filter_map(convert_spell).collect())
    }

    pub fn import_equipment(&self) -> Result<Vec<Equipment>, ImportError> {
        let raw: Vec<SrdEquipment> = self.read_optional(EQUIPMENT_FILE)?;
        Ok(raw.into_iter().filter_map(convert_equipment).collect())
    }

    pub fn import_proficiencies(&self) -> Result<Vec<Proficiency>, ImportError> {
        let raw: Vec<SrdProficiency> = self.read_optional(PROFICIENCIES_FILE)?;
        Ok(raw.into_iter().filter_map(convert_proficiency).collect())
    }

    pub fn import_languages(&self) -> Result<Vec<Language>, ImportError> {
        let raw: Vec<SrdLanguage> = self.read_optional(LANGUAGES_FILE)?;
        Ok(raw
            .into_iter()
            .filter_map(|raw| {
                let index = required_index(&raw.index, "language")?;
                Some(Language {
                    index,
                    name: raw.name,
                    kind: raw.kind,
                })
            })
            .collect())
    }

    pub fn import_alignments(&self) -> Result<Vec<Alignment>, ImportError> {
        let raw: Vec<SrdAlignment> = self.read_optional(ALIGNMENTS_FILE)?;
        Ok(raw
            .into_iter()
            .filter_map(|raw| {
                let index = required_index(&raw.index, "alignment")?;
                Some(Alignment {
                    index,
                    name: raw.name,
                    abbreviation: raw.abbreviation,
                })
            })
            .collect())
    }

    // =========================================================================
    // File access
    // =========================================================================

    fn read_required<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, ImportError> {
        let path = self.data_path.join(file);
        if !path.exists() {
            return Err(ImportError::DataFileNotFound(path));
        }
        self.read_entries(file)
    }

    /// A missing optional resource is an empty collection.
    fn read_optional<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, ImportError> {
        if !self.data_path.join(file).exists() {
            debug!(file, "Optional SRD file missing, using empty collection");
            return Ok(Vec::new());
        }
        self.read_entries(file)
    }

    fn read_entries<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, ImportError> {
        let path = self.data_path.join(file);
        let content = fs::read_to_string(&path)?;
        let entries: Vec<T> = serde_json::from_str(&content)?;
        debug!(file, count = entries.len(), "Read SRD file");
        Ok(entries)
    }
}

// =============================================================================
// Conversion
// =============================================================================

fn required_index(index: &str, kind: &'static str) -> Option<String> {
    let index = index.trim().to_lowercase();
    if index.is_empty() {
        warn!(kind, "Skipping record without an index");
        return None;
    }
    Some(index)
}

fn convert_reference(raw: &SrdReference) -> Option<Reference> {
    let index = raw.resolved_index()?;
    let name = raw.name.clone().unwrap_or_else(|| index.clone());
    Some(Reference::new(index, name))
}

fn convert_references(raw: &[SrdReference]) -> Vec<Reference> {
    raw.iter().filter_map(convert_reference).collect()
}

fn convert_ability_bonuses(raw: &[SrdAbilityBonus], owner: &str) -> Vec<AbilityBonus> {
    raw.iter()
        .filter_map(|bonus| {
            let key = bonus.ability_score.resolved_index()?;
            match key.parse::<Ability>() {
                Ok(ability) => Some(AbilityBonus::new(ability, bonus.bonus)),
                Err(e) => {
                    warn!(owner, error = %e, "Skipping ability bonus");
                    None
                }
            }
        })
        .collect()
}

/// Converts a choice declaration. Unsupported option-set shapes and blocks
/// that end up without options yield `None`.
fn convert_choice(raw: SrdChoice, languages: &[Language]) -> Option<ChoiceBlock> {
    let options: Vec<ChoiceEntry> = match raw.from? {
        SrdOptionSet::OptionsArray { options } => options
            .into_iter()
            .filter_map(|option| convert_option(option, languages))
            .collect(),
        SrdOptionSet::ResourceList { resource_list_url }
            if resource_list_url.trim_end_matches('/') == LANGUAGES_RESOURCE =>
        {
            languages
                .iter()
                .map(|language| ChoiceEntry::reference(language.index.clone(), language.name.clone()))
                .collect()
        }
        SrdOptionSet::ResourceList { resource_list_url } => {
            debug!(url = %resource_list_url, "Skipping unsupported resource list");
            return None;
        }
        SrdOptionSet::Unsupported => {
            debug!(desc = ?raw.desc, "Skipping unsupported option set");
            return None;
        }
    };
    if options.is_empty() {
        return None;
    }

    let mut block = ChoiceBlock::new(raw.choose, options);
    block.desc = raw.desc;
    block.kind = raw.kind;
    Some(block)
}

fn convert_option(raw: SrdOption, languages: &[Language]) -> Option<ChoiceEntry> {
    match raw {
        SrdOption::Reference { item } | SrdOption::CountedReference { of: item } => {
            convert_reference(&item).map(|item| ChoiceEntry::Reference { item })
        }
        SrdOption::Choice { choice } => {
            convert_choice(*choice, languages).map(|choice| ChoiceEntry::Choice { choice })
        }
        SrdOption::Unsupported => None,
    }
}

fn convert_race(raw: SrdRace, languages: &[Language]) -> Option<Race> {
    let index = required_index(&raw.index, "race")?;
    let mut race = Race::new(index.clone(), raw.name, raw.speed.unwrap_or(30));
    race.ability_bonuses = convert_ability_bonuses(&raw.ability_bonuses, &index);
    race.size = raw.size;
    race.starting_proficiencies = convert_references(&raw.starting_proficiencies);
    race.starting_proficiency_options = raw
        .starting_proficiency_options
        .and_then(|choice| convert_choice(choice, languages));
    race.languages = convert_references(&raw.languages);
    race.language_options = raw
        .language_options
        .and_then(|choice| convert_choice(choice, languages));
    race.traits = convert_references(&raw.traits);
    Some(race)
}

fn convert_subrace(raw: SrdSubrace, languages: &[Language]) -> Option<Subrace> {
    let index = required_index(&raw.index, "subrace")?;
    let parent = raw
        .race
        .as_ref()
        .and_then(SrdReference::resolved_index)
        .unwrap_or_default();
    let mut subrace = Subrace::new(index.clone(), raw.name, parent);
    subrace.ability_bonuses = convert_ability_bonuses(&raw.ability_bonuses, &index);
    subrace.starting_proficiencies = convert_references(&raw.starting_proficiencies);
    subrace.languages = convert_references(&raw.languages);
    subrace.language_options = raw
        .language_options
        .and_then(|choice| convert_choice(choice, languages));
    subrace.traits = convert_references(&raw.racial_traits);
    Some(subrace)
}

fn convert_class(raw: SrdClass, languages: &[Language]) -> Option<CharacterClass> {
    let index = required_index(&raw.index, "class")?;
    let mut class = CharacterClass::new(index.clone(), raw.name, raw.hit_die);
    class.proficiencies = convert_references(&raw.proficiencies);
    class.proficiency_choices = raw
        .proficiency_choices
        .into_iter()
        .filter_map(|choice| convert_choice(choice, languages))
        .collect();

    // Saving throws come from the ability refs and any saving-throw proficiency.
    let mut saving_throws: Vec<Ability> = Vec::new();
    let from_refs = raw
        .saving_throws
        .iter()
        .filter_map(SrdReference::resolved_index)
        .filter_map(|key| key.parse::<Ability>().ok());
    let from_proficiencies = class
        .proficiencies
        .iter()
        .filter_map(|p| Ability::from_saving_throw_index(&p.index));
    for ability in from_refs.chain(from_proficiencies) {
        if !saving_throws.contains(&ability) {
            saving_throws.push(ability);
        }
    }
    class.saving_throws = saving_throws;

    if let Some(spellcasting) = raw.spellcasting {
        match spellcasting
            .spellcasting_ability
            .resolved_index()
            .map(|key| key.parse::<Ability>())
        {
            Some(Ok(ability)) => {
                class.spellcasting = Some(Spellcasting {
                    level: spellcasting.level.unwrap_or(1),
                    ability,
                });
            }
            _ => warn!(class = %index, "Ignoring spellcasting without a valid ability"),
        }
    }
    Some(class)
}

fn convert_level(raw: SrdLevel) -> ClassLevel {
    let mut level = ClassLevel::new(raw.level);
    level.prof_bonus = raw.prof_bonus;
    level.ability_score_bonuses = raw.ability_score_bonuses.unwrap_or(0);
    level.features = convert_references(&raw.features);
    level.spellcasting = raw.spellcasting.map(|casting| LevelSpellcasting {
        cantrips_known: casting.cantrips_known,
        spells_known: casting.spells_known,
        slots: casting.slots(),
    });
    level
}

fn convert_background(raw: SrdBackground, languages: &[Language]) -> Option<Background> {
    let index = required_index(&raw.index, "background")?;
    let mut background = Background::new(index, raw.name);
    background.starting_proficiencies = convert_references(&raw.starting_proficiencies);
    background.starting_proficiency_options = raw
        .starting_proficiency_options
        .and_then(|choice| convert_choice(choice, languages));
    background.language_options = raw
        .language_options
        .and_then(|choice| convert_choice(choice, languages));
    background.feature = raw.feature.map(|feature| BackgroundFeature {
        name: feature.name,
        desc: feature.desc,
    });
    Some(background)
}

fn convert_spell(raw: SrdSpell) -> Option<Spell> {
    let index = required_index(&raw.index, "spell")?;
    if raw.level > 9 {
        warn!(spell = %index, level = raw.level, "Skipping spell with invalid level");
        return None;
    }
    let mut spell = Spell::new(index, raw.name, raw.level);
    spell.school = raw.school.and_then(|school| school.name);
    spell.classes = raw
        .classes
        .iter()
        .filter_map(SrdReference::resolved_index)
        .collect();
    spell.subclasses = raw
        .subclasses
        .iter()
        .filter_map(SrdReference::resolved_index)
        .collect();
    Some(spell)
}

fn convert_equipment(raw: SrdEquipment) -> Option<Equipment> {
    let index = required_index(&raw.index, "equipment")?;
    let category = raw
        .equipment_category
        .as_ref()
        .and_then(SrdReference::resolved_index)
        .unwrap_or_default();
    let mut item = Equipment::new(index, raw.name, category);
    item.weapon_category = raw.weapon_category;
    item.armor_category = raw.armor_category;
    Some(item)
}

fn convert_proficiency(raw: SrdProficiency) -> Option<Proficiency> {
    let index = required_index(&raw.index, "proficiency")?;
    let mut proficiency = Proficiency::new(index, raw.name, proficiency_type(&raw.kind));
    proficiency.reference = raw.reference.as_ref().and_then(convert_reference);
    Some(proficiency)
}

fn proficiency_type(kind: &str) -> ProficiencyType {
    match kind.trim() {
        "Armor" => ProficiencyType::Armor,
        "Weapons" => ProficiencyType::Weapons,
        "Artisan's Tools" => ProficiencyType::ArtisansTools,
        "Skills" => ProficiencyType::Skills,
        "Saving Throws" => ProficiencyType::SavingThrows,
        "Other Tools" => ProficiencyType::OtherTools,
        "Gaming Sets" => ProficiencyType::GamingSets,
        "Musical Instruments" => ProficiencyType::MusicalInstruments,
        "Vehicles" => ProficiencyType::Vehicles,
        _ => ProficiencyType::Other,
    }
}
