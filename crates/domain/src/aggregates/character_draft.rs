//! CharacterDraft aggregate - the in-progress character
//!
//! # Invariants
//!
//! - `level` is always within 1..=20 and base scores within 1..=30
//! - prepared spells are always a subset of known spells
//! - expertise is always a subset of selected skill proficiencies
//! - automatic grants, choice-derived grants, racial bonus layers and the
//!   derived-stats cache are only written by [`CharacterDraft::refresh`]
//!
//! Setters normalize their input and report whether anything changed. They
//! never touch locks: deciding what a mutation locks belongs to the caller.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::choices::{
    discover_groups, fold_selections, prune_selections, ChoiceGroup, ChoiceSelections,
    ChoiceSources,
};
use crate::compendium::RulesDataset;
use crate::entities::{CharacterClass, Race};
use crate::error::DomainError;
use crate::events::{RefreshOutcome, StructuralChange};
use crate::proficiencies::automatic_grants;
use crate::rules::{clamp_level, derive_stats, StatInputs};
use crate::types::{Ability, Gender, Skill};
use crate::value_objects::{
    AbilityBreakdown, AbilityScores, AbilityTable, Currency, Denomination, DerivedStats,
    EquipmentRef, Grants, LockField, LockSet, SpellBook, SpellBucket, MAX_ABILITY_SCORE,
    MAX_MANUAL_BONUS, MIN_ABILITY_SCORE,
};

pub const DEFAULT_NAME: &str = "New Adventurer";

/// Trims and lowercases an identifier; blank input means "unset".
pub fn normalize_identifier(value: &str) -> Option<String> {
    let value = value.trim().to_lowercase();
    (!value.is_empty()).then_some(value)
}

/// Lowercases an equipment entry and writes its magic suffix as `id+N`.
fn normalize_equipment(value: &str) -> Option<String> {
    normalize_identifier(value).map(|id| EquipmentRef::parse(&id).to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDraft {
    name: String,
    level: u8,
    race: Option<String>,
    subrace: Option<String>,
    class: Option<String>,
    subclass: Option<String>,
    background: Option<String>,
    alignment: Option<String>,
    gender: Option<Gender>,
    abilities: AbilityScores,
    manual_hit_points: Option<i32>,
    /// Granted by race, subrace, class and background records.
    automatic: Grants,
    /// Explicit player toggles.
    selected: Grants,
    /// Resolved from stored choice selections.
    from_choices: Grants,
    expertise: BTreeSet<Skill>,
    choice_selections: ChoiceSelections,
    spells: SpellBook,
    equipment: Vec<String>,
    currency: Currency,
    notes: String,
    biography: String,
    derived: DerivedStats,
    locks: LockSet,
}

impl Default for CharacterDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterDraft {
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            level: 1,
            race: None,
            subrace: None,
            class: None,
            subclass: None,
            background: None,
            alignment: None,
            gender: None,
            abilities: AbilityScores::default(),
            manual_hit_points: None,
            automatic: Grants::default(),
            selected: Grants::default(),
            from_choices: Grants::default(),
            expertise: BTreeSet::new(),
            choice_selections: ChoiceSelections::new(),
            spells: SpellBook::default(),
            equipment: Vec::new(),
            currency: Currency::default(),
            notes: String::new(),
            biography: String::new(),
            derived: DerivedStats::default(),
            locks: LockSet::default(),
        }
    }

    /// Back to defaults, locks included.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // =========================================================================
    // Identity accessors
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn race(&self) -> Option<&str> {
        self.race.as_deref()
    }

    pub fn subrace(&self) -> Option<&str> {
        self.subrace.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn subclass(&self) -> Option<&str> {
        self.subclass.as_deref()
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn alignment(&self) -> Option<&str> {
        self.alignment.as_deref()
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    // =========================================================================
    // Other accessors
    // =========================================================================

    pub fn abilities(&self) -> &AbilityScores {
        &self.abilities
    }

    pub fn ability_breakdown(&self) -> Vec<AbilityBreakdown> {
        Ability::ALL
            .into_iter()
            .map(|ability| self.abilities.breakdown(ability))
            .collect()
    }

    pub fn manual_hit_points(&self) -> Option<i32> {
        self.manual_hit_points
    }

    pub fn automatic_grants(&self) -> &Grants {
        &self.automatic
    }

    pub fn selected_grants(&self) -> &Grants {
        &self.selected
    }

    pub fn choice_grants(&self) -> &Grants {
        &self.from_choices
    }

    /// Union of automatic, selected and choice-derived grants.
    pub fn effective_grants(&self) -> Grants {
        Grants::union([&self.automatic, &self.selected, &self.from_choices])
    }

    pub fn expertise(&self) -> &BTreeSet<Skill> {
        &self.expertise
    }

    pub fn choice_selections(&self) -> &ChoiceSelections {
        &self.choice_selections
    }

    pub fn choice_selection(&self, group_id: &str) -> Option<&BTreeSet<String>> {
        self.choice_selections.get(group_id)
    }

    pub fn spells(&self) -> &SpellBook {
        &self.spells
    }

    pub fn equipment(&self) -> &[String] {
        &self.equipment
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn biography(&self) -> &str {
        &self.biography
    }

    pub fn derived(&self) -> &DerivedStats {
        &self.derived
    }

    pub fn locks(&self) -> &LockSet {
        &self.locks
    }

    pub fn is_locked(&self, field: LockField) -> bool {
        self.locks.is_locked(field)
    }

    // =========================================================================
    // Identity setters
    // =========================================================================

    /// Blank names fall back to the default name. Returns whether the stored
    /// name changed.
    pub fn set_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        let name = if name.is_empty() { DEFAULT_NAME } else { name };
        if self.name == name {
            return false;
        }
        self.name = name.to_string();
        true
    }

    /// Clamps into 1..=20.
    pub fn set_level(&mut self, level: i64) -> bool {
        let level = clamp_level(level);
        let changed = self.level != level;
        self.level = level;
        changed
    }

    /// Sets the race and drops the subrace if `record` does not offer it.
    pub fn set_race(&mut self, race: Option<String>, record: Option<&Race>) -> StructuralChange {
        if self.race == race {
            return StructuralChange::Unchanged;
        }
        self.race = race;
        let keep = match (&self.subrace, record) {
            (Some(subrace), Some(record)) => record.subrace(subrace).is_some(),
            (Some(_), None) => false,
            (None, _) => true,
        };
        if !keep {
            self.subrace = None;
        }
        StructuralChange::Changed {
            dependent_cleared: !keep,
        }
    }

    pub fn set_subrace(&mut self, subrace: Option<String>) -> bool {
        let changed = self.subrace != subrace;
        self.subrace = subrace;
        changed
    }

    /// Sets the class and drops the subclass if `record` does not offer it.
    pub fn set_class(
        &mut self,
        class: Option<String>,
        record: Option<&CharacterClass>,
    ) -> StructuralChange {
        if self.class == class {
            return StructuralChange::Unchanged;
        }
        self.class = class;
        let keep = match (&self.subclass, record) {
            (Some(subclass), Some(record)) => record.subclass(subclass).is_some(),
            (Some(_), None) => false,
            (None, _) => true,
        };
        if !keep {
            self.subclass = None;
        }
        StructuralChange::Changed {
            dependent_cleared: !keep,
        }
    }

    pub fn set_subclass(&mut self, subclass: Option<String>) -> bool {
        let changed = self.subclass != subclass;
        self.subclass = subclass;
        changed
    }

    pub fn set_background(&mut self, background: Option<String>) -> bool {
        let changed = self.background != background;
        self.background = background;
        changed
    }

    pub fn set_alignment(&mut self, alignment: Option<String>) -> bool {
        let changed = self.alignment != alignment;
        self.alignment = alignment;
        changed
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) -> bool {
        let changed = self.gender != gender;
        self.gender = gender;
        changed
    }

    // =========================================================================
    // Ability setters
    // =========================================================================

    /// Clamps into 1..=30.
    pub fn set_base_score(&mut self, ability: Ability, score: i32) -> bool {
        let score = score.clamp(MIN_ABILITY_SCORE, MAX_ABILITY_SCORE);
        let changed = self.abilities.base[ability] != score;
        self.abilities.base[ability] = score;
        changed
    }

    pub fn set_base_scores(&mut self, scores: AbilityTable) -> bool {
        let mut changed = false;
        for (ability, score) in scores.iter() {
            changed |= self.set_base_score(ability, score);
        }
        changed
    }

    pub fn set_manual_bonus(&mut self, ability: Ability, bonus: i32) -> Result<bool, DomainError> {
        if bonus.abs() > MAX_MANUAL_BONUS {
            return Err(DomainError::validation(format!(
                "Manual bonus for {ability} must be within -{MAX_MANUAL_BONUS}..={MAX_MANUAL_BONUS}"
            )));
        }
        let changed = self.abilities.manual[ability] != bonus;
        self.abilities.manual[ability] = bonus;
        Ok(changed)
    }

    /// Resets base scores to 10 and clears manual bonuses and the HP override.
    pub fn reset_abilities(&mut self) -> bool {
        let defaults = AbilityScores::default();
        let changed = self.abilities.base != defaults.base
            || self.abilities.manual != defaults.manual
            || self.manual_hit_points.is_some();
        self.abilities.base = defaults.base;
        self.abilities.manual = defaults.manual;
        self.manual_hit_points = None;
        changed
    }

    pub fn set_manual_hit_points(&mut self, hit_points: Option<i32>) -> Result<bool, DomainError> {
        if let Some(hp) = hit_points {
            if hp < 1 {
                return Err(DomainError::validation(
                    "Manual hit points must be at least 1",
                ));
            }
        }
        let changed = self.manual_hit_points != hit_points;
        self.manual_hit_points = hit_points;
        Ok(changed)
    }

    // =========================================================================
    // Proficiency setters
    // =========================================================================

    /// Removing a skill also removes its expertise.
    pub fn toggle_skill(&mut self, skill: Skill, enabled: bool) -> bool {
        if enabled {
            self.selected.skills.insert(skill)
        } else {
            let removed = self.selected.skills.remove(&skill);
            self.expertise.remove(&skill) || removed
        }
    }

    /// Adding expertise also selects the skill.
    pub fn toggle_expertise(&mut self, skill: Skill, enabled: bool) -> bool {
        if enabled {
            let selected = self.selected.skills.insert(skill);
            self.expertise.insert(skill) || selected
        } else {
            self.expertise.remove(&skill)
        }
    }

    /// Clears selected skills and expertise.
    pub fn clear_skills(&mut self) -> bool {
        let changed = !self.selected.skills.is_empty() || !self.expertise.is_empty();
        self.selected.skills.clear();
        self.expertise.clear();
        changed
    }

    pub fn has_skill_selections(&self) -> bool {
        !self.selected.skills.is_empty() || !self.expertise.is_empty()
    }

    pub fn toggle_language(&mut self, language: &str, enabled: bool) -> bool {
        toggle_member(&mut self.selected.languages, language, enabled)
    }

    pub fn toggle_tool(&mut self, tool: &str, enabled: bool) -> bool {
        toggle_member(&mut self.selected.tools, tool, enabled)
    }

    // =========================================================================
    // Choice selections
    // =========================================================================

    /// Stores the normalized selection for `group`. An empty selection
    /// removes the entry.
    pub fn set_choice_selection<I, S>(&mut self, group: &ChoiceGroup, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selection = group.normalize_selection(ids);
        let previous = self.choice_selections.get(&group.id);
        if previous.map(|p| p == &selection).unwrap_or(selection.is_empty()) {
            return false;
        }
        if selection.is_empty() {
            self.choice_selections.remove(&group.id);
        } else {
            self.choice_selections.insert(group.id.clone(), selection);
        }
        true
    }

    pub fn clear_choice_selections(&mut self) -> bool {
        let changed = !self.choice_selections.is_empty();
        self.choice_selections.clear();
        changed
    }

    pub fn has_choice_selections(&self) -> bool {
        self.choice_selections.values().any(|s| !s.is_empty())
    }

    // =========================================================================
    // Spells, equipment, currency, text
    // =========================================================================

    pub fn toggle_spell(&mut self, bucket: SpellBucket, spell: &str, enabled: bool) -> bool {
        self.spells.toggle(bucket, spell, enabled)
    }

    pub fn clear_spells(&mut self) -> bool {
        let changed = !self.spells.is_empty();
        self.spells.clear();
        changed
    }

    pub fn add_equipment(&mut self, item: &str) -> Result<(), DomainError> {
        let item = normalize_equipment(item)
            .ok_or_else(|| DomainError::validation("Equipment id cannot be empty"))?;
        self.equipment.push(item);
        Ok(())
    }

    /// Removes the entry at `position`, returning it.
    pub fn remove_equipment(&mut self, position: usize) -> Result<String, DomainError> {
        if position >= self.equipment.len() {
            return Err(DomainError::not_found("EquipmentSlot", position.to_string()));
        }
        Ok(self.equipment.remove(position))
    }

    pub fn set_equipment<I, S>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items: Vec<String> = items
            .into_iter()
            .filter_map(|item| normalize_equipment(item.as_ref()))
            .collect();
        let changed = self.equipment != items;
        self.equipment = items;
        changed
    }

    pub fn set_currency(&mut self, denomination: Denomination, amount: u32) -> bool {
        let changed = self.currency.get(denomination) != amount;
        self.currency.set(denomination, amount);
        changed
    }

    pub fn replace_currency(&mut self, currency: Currency) -> bool {
        let changed = self.currency != currency;
        self.currency = currency;
        changed
    }

    pub fn set_notes(&mut self, notes: &str) -> bool {
        let changed = self.notes != notes;
        self.notes = notes.to_string();
        changed
    }

    pub fn set_biography(&mut self, biography: &str) -> bool {
        let changed = self.biography != biography;
        self.biography = biography.to_string();
        changed
    }

    pub fn set_locked(&mut self, field: LockField, locked: bool) {
        self.locks.set(field, locked);
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Recomputes everything derived from the inputs, in order: racial
    /// bonus layers, choice groups (rebuilt in place) with selection pruning,
    /// automatic and choice-derived grants, then the derived-stats cache.
    ///
    /// Unresolvable identifiers count as "no selection".
    pub fn refresh(
        &mut self,
        dataset: &dyn RulesDataset,
        groups: &mut BTreeMap<String, ChoiceGroup>,
    ) -> RefreshOutcome {
        let race = self.race.as_deref().and_then(|id| dataset.race(id));
        let subrace = race
            .zip(self.subrace.as_deref())
            .and_then(|(race, id)| race.subrace(id));
        let class = self.class.as_deref().and_then(|id| dataset.class(id));
        let background = self
            .background
            .as_deref()
            .and_then(|id| dataset.background(id));
        let sources = ChoiceSources {
            race,
            subrace,
            class,
            background,
        };

        let mut racial = AbilityTable::default();
        for bonus in race.map(|r| r.ability_bonuses.as_slice()).unwrap_or_default() {
            racial[bonus.ability] += bonus.bonus;
        }
        let mut subrace_layer = AbilityTable::default();
        for bonus in subrace
            .map(|s| s.ability_bonuses.as_slice())
            .unwrap_or_default()
        {
            subrace_layer[bonus.ability] += bonus.bonus;
        }
        let mut inputs_changed =
            racial != self.abilities.racial || subrace_layer != self.abilities.subrace;
        self.abilities.racial = racial;
        self.abilities.subrace = subrace_layer;

        let rebuilt = discover_groups(sources);
        let choice_groups_changed = *groups != rebuilt;
        if choice_groups_changed {
            groups.clear();
            groups.extend(rebuilt);
        }
        let selections_pruned = prune_selections(&mut self.choice_selections, groups);

        let automatic = automatic_grants(sources, dataset);
        let from_choices = fold_selections(&self.choice_selections, groups, dataset);
        inputs_changed |= automatic != self.automatic || from_choices != self.from_choices;
        self.automatic = automatic;
        self.from_choices = from_choices;

        let effective = self.effective_grants();
        let derived = derive_stats(&StatInputs {
            level: self.level,
            abilities: &self.abilities,
            manual_hit_points: self.manual_hit_points,
            class,
            race,
            skills: &effective.skills,
            expertise: &self.expertise,
            saving_throws: &effective.saving_throws,
        });
        let derived_changed = derived != self.derived;
        self.derived = derived;

        RefreshOutcome {
            derived_changed,
            choice_groups_changed,
            selections_pruned,
            inputs_changed,
        }
    }
}

fn toggle_member(set: &mut BTreeSet<String>, value: &str, enabled: bool) -> bool {
    let Some(value) = normalize_identifier(value) else {
        return false;
    };
    if enabled {
        set.insert(value)
    } else {
        set.remove(&value)
    }
}
