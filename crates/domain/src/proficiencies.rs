//! Automatic proficiency and language grants.
//!
//! Race, subrace, class and background records hand out proficiencies by
//! reference. Each reference is classified once, using the dataset's
//! proficiency category when a record exists and the identifier prefix
//! (`skill-`, `saving-throw-`) otherwise.

use crate::choices::ChoiceSources;
use crate::compendium::RulesDataset;
use crate::entities::{ProficiencyType, Reference};
use crate::types::{Ability, Skill};
use crate::value_objects::Grants;

/// What a single proficiency reference contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProficiencyGrant {
    Skill(Skill),
    SavingThrow(Ability),
    Tool(String),
    Armor(String),
    Weapon(String),
}

impl ProficiencyGrant {
    pub fn apply(self, grants: &mut Grants) {
        match self {
            Self::Skill(skill) => {
                grants.skills.insert(skill);
            }
            Self::SavingThrow(ability) => {
                grants.saving_throws.insert(ability);
            }
            Self::Tool(id) => {
                grants.tools.insert(id);
            }
            Self::Armor(id) => {
                grants.armor.insert(id);
            }
            Self::Weapon(id) => {
                grants.weapons.insert(id);
            }
        }
    }
}

/// Classifies a proficiency identifier. Unknown identifiers without a
/// recognised prefix classify as nothing.
pub fn classify_proficiency(id: &str, dataset: &dyn RulesDataset) -> Option<ProficiencyGrant> {
    let id = id.trim().to_lowercase();
    if id.starts_with("skill-") {
        return id.parse::<Skill>().ok().map(ProficiencyGrant::Skill);
    }
    if let Some(ability) = Ability::from_saving_throw_index(&id) {
        return Some(ProficiencyGrant::SavingThrow(ability));
    }

    let record = dataset.proficiency(&id)?;
    let referenced = record.reference.as_ref().map(|r| r.index.as_str());
    match record.kind {
        ProficiencyType::Skills => referenced
            .unwrap_or(&record.index)
            .parse::<Skill>()
            .ok()
            .map(ProficiencyGrant::Skill),
        ProficiencyType::SavingThrows => referenced
            .and_then(|r| r.parse::<Ability>().ok())
            .or_else(|| Ability::from_saving_throw_index(&record.index))
            .map(ProficiencyGrant::SavingThrow),
        ProficiencyType::Armor => Some(ProficiencyGrant::Armor(record.index.clone())),
        ProficiencyType::Weapons => Some(ProficiencyGrant::Weapon(record.index.clone())),
        kind if kind.is_tool() => Some(ProficiencyGrant::Tool(record.index.clone())),
        _ => None,
    }
}

/// Grants that follow from the structural records alone.
pub fn automatic_grants(sources: ChoiceSources<'_>, dataset: &dyn RulesDataset) -> Grants {
    let mut grants = Grants::default();
    let grant_all = |references: &[Reference], grants: &mut Grants| {
        for reference in references {
            if let Some(grant) = classify_proficiency(&reference.index, dataset) {
                grant.apply(grants);
            }
        }
    };

    if let Some(race) = sources.race {
        grant_all(&race.starting_proficiencies, &mut grants);
        grants
            .languages
            .extend(race.languages.iter().map(|l| l.index.to_lowercase()));
    }
    if let Some(subrace) = sources.subrace {
        grant_all(&subrace.starting_proficiencies, &mut grants);
        grants
            .languages
            .extend(subrace.languages.iter().map(|l| l.index.to_lowercase()));
    }
    if let Some(background) = sources.background {
        grant_all(&background.starting_proficiencies, &mut grants);
    }
    if let Some(class) = sources.class {
        grant_all(&class.proficiencies, &mut grants);
        grants
            .saving_throws
            .extend(class.saving_throws.iter().copied());
    }
    grants
}
