//! Choice resolution
//!
//! Turns the "choose N of M" blocks declared by race, subrace, class and
//! background records into [`ChoiceGroup`]s with stable identifiers, keeps
//! stored selections legal across rebuilds, and folds the selections back
//! into proficiency and language sets.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::compendium::RulesDataset;
use crate::entities::{Background, CharacterClass, ChoiceBlock, Race, Subrace};
use crate::proficiencies::{classify_proficiency, ProficiencyGrant};
use crate::types::{Ability, Skill};
use crate::value_objects::Grants;

/// Stored selections keyed by choice group id.
pub type ChoiceSelections = BTreeMap<String, BTreeSet<String>>;

/// What a choice option grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    Skill,
    Language,
    Tool,
    Equipment,
    SavingThrow,
    Ability,
    Misc,
}

impl OptionKind {
    /// Infers the kind from an identifier prefix.
    pub fn infer(id: &str) -> Self {
        let id = id.trim().to_lowercase();
        if id.starts_with("skill-") {
            Self::Skill
        } else if id.starts_with("language-") {
            Self::Language
        } else if id.starts_with("tool-") || id.starts_with("instrument-") {
            Self::Tool
        } else if id.starts_with("armor-") || id.starts_with("weapon-") {
            Self::Equipment
        } else if id.starts_with("saving-throw-") {
            Self::SavingThrow
        } else if id.starts_with("ability-score-") {
            Self::Ability
        } else {
            Self::Misc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    pub kind: OptionKind,
}

/// A discovered decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceGroup {
    /// `source:record:locator`, e.g. `race:elf:languages`.
    pub id: String,
    pub label: String,
    pub choose: usize,
    pub options: Vec<ChoiceOption>,
}

impl ChoiceGroup {
    /// Builds a group from a rules block. Blocks that ask for nothing or
    /// offer nothing yield `None`.
    pub fn from_block(
        id: impl Into<String>,
        label: impl Into<String>,
        block: &ChoiceBlock,
        kind: Option<OptionKind>,
    ) -> Option<Self> {
        if block.choose == 0 {
            return None;
        }
        let mut seen = BTreeSet::new();
        let options: Vec<ChoiceOption> = block
            .flattened()
            .into_iter()
            .filter_map(|item| {
                let option_id = if item.index.trim().is_empty() {
                    item.name.trim().to_lowercase()
                } else {
                    item.index.trim().to_lowercase()
                };
                if option_id.is_empty() || !seen.insert(option_id.clone()) {
                    return None;
                }
                let label = if item.name.trim().is_empty() {
                    option_id.clone()
                } else {
                    item.name.clone()
                };
                let kind = kind.unwrap_or_else(|| OptionKind::infer(&option_id));
                Some(ChoiceOption {
                    id: option_id,
                    label,
                    kind,
                })
            })
            .collect();
        if options.is_empty() {
            return None;
        }
        Some(Self {
            id: id.into(),
            label: label.into(),
            choose: block.choose as usize,
            options,
        })
    }

    pub fn option(&self, id: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Keeps only legal ids and trims to `choose` in lexicographic order.
    pub fn normalize_selection<I, S>(&self, ids: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .map(|id| id.as_ref().trim().to_lowercase())
            .filter(|id| self.option(id).is_some())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .take(self.choose)
            .collect()
    }
}

/// The structural records a character currently resolves to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChoiceSources<'a> {
    pub race: Option<&'a Race>,
    pub subrace: Option<&'a Subrace>,
    pub class: Option<&'a CharacterClass>,
    pub background: Option<&'a Background>,
}

/// Every choice group offered by the given records, keyed by group id.
pub fn discover_groups(sources: ChoiceSources<'_>) -> BTreeMap<String, ChoiceGroup> {
    let mut groups = Vec::new();

    if let Some(race) = sources.race {
        if let Some(block) = &race.language_options {
            groups.push(ChoiceGroup::from_block(
                format!("race:{}:languages", race.index),
                format!("{} Bonus Languages", race.name),
                block,
                Some(OptionKind::Language),
            ));
        }
        if let Some(block) = &race.starting_proficiency_options {
            groups.push(ChoiceGroup::from_block(
                format!("race:{}:proficiencies", race.index),
                format!("{} Bonus Proficiencies", race.name),
                block,
                None,
            ));
        }
    }

    if let Some(subrace) = sources.subrace {
        if let Some(block) = &subrace.language_options {
            groups.push(ChoiceGroup::from_block(
                format!("subrace:{}:languages", subrace.index),
                format!("{} Languages", subrace.name),
                block,
                Some(OptionKind::Language),
            ));
        }
        if let Some(block) = &subrace.starting_proficiency_options {
            groups.push(ChoiceGroup::from_block(
                format!("subrace:{}:proficiencies", subrace.index),
                format!("{} Bonus Proficiencies", subrace.name),
                block,
                None,
            ));
        }
    }

    if let Some(class) = sources.class {
        for (position, block) in class.proficiency_choices.iter().enumerate() {
            let label = block
                .desc
                .as_deref()
                .map(str::trim)
                .filter(|desc| !desc.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} Choice {}", class.name, position + 1));
            groups.push(ChoiceGroup::from_block(
                format!("class:{}:prof-{}", class.index, position),
                label,
                block,
                None,
            ));
        }
    }

    if let Some(background) = sources.background {
        if let Some(block) = &background.language_options {
            groups.push(ChoiceGroup::from_block(
                format!("background:{}:languages", background.index),
                format!("{} Languages", background.name),
                block,
                Some(OptionKind::Language),
            ));
        }
        if let Some(block) = &background.starting_proficiency_options {
            groups.push(ChoiceGroup::from_block(
                format!("background:{}:proficiencies", background.index),
                format!("{} Bonus Proficiencies", background.name),
                block,
                None,
            ));
        }
    }

    groups
        .into_iter()
        .flatten()
        .map(|group| (group.id.clone(), group))
        .collect()
}

/// Drops selections for vanished groups and re-normalizes the rest against
/// their group's current options. Returns whether anything changed.
pub fn prune_selections(
    selections: &mut ChoiceSelections,
    groups: &BTreeMap<String, ChoiceGroup>,
) -> bool {
    let before = selections.clone();
    selections.retain(|id, _| groups.contains_key(id));
    for (id, selected) in selections.iter_mut() {
        if let Some(group) = groups.get(id) {
            *selected = group.normalize_selection(selected.iter());
        }
    }
    selections.retain(|_, selected| !selected.is_empty());
    *selections != before
}

/// Folds stored selections into proficiency and language grants.
///
/// Tool, armor and weapon classification comes from the dataset's
/// proficiency category. An option only counts as a tool without a dataset
/// record when its identifier itself marks it as one.
pub fn fold_selections(
    selections: &ChoiceSelections,
    groups: &BTreeMap<String, ChoiceGroup>,
    dataset: &dyn RulesDataset,
) -> Grants {
    let mut grants = Grants::default();
    for (group_id, selected) in selections {
        let Some(group) = groups.get(group_id) else {
            continue;
        };
        for option in selected.iter().filter_map(|id| group.option(id)) {
            fold_option(option, dataset, &mut grants);
        }
    }
    grants
}

fn fold_option(option: &ChoiceOption, dataset: &dyn RulesDataset, grants: &mut Grants) {
    match option.kind {
        OptionKind::Language => {
            grants.languages.insert(option.id.clone());
        }
        OptionKind::Skill => {
            if let Ok(skill) = option.id.parse::<Skill>() {
                grants.skills.insert(skill);
            }
        }
        OptionKind::SavingThrow => {
            if let Some(ability) = Ability::from_saving_throw_index(&option.id) {
                grants.saving_throws.insert(ability);
            }
        }
        OptionKind::Tool | OptionKind::Equipment | OptionKind::Ability | OptionKind::Misc => {
            match classify_proficiency(&option.id, dataset) {
                Some(grant) => grant.apply(grants),
                None if option.kind == OptionKind::Tool => {
                    ProficiencyGrant::Tool(option.id.clone()).apply(grants);
                }
                None => {}
            }
        }
    }
}
