//! Character builder - the mutation surface over a character draft.
//!
//! Every mutator follows the same contract: validate and normalize the input,
//! apply it to the draft, lock or unlock the field for the randomizer,
//! refresh the derived parts of the draft, then raise the change events.
//! Invalid input is rejected before anything is touched.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use charsmith_domain::{
    normalize_identifier, Ability, AbilityBreakdown, CharacterDraft, CharacterEvent, ChoiceGroup,
    Denomination, DerivedStats, DomainError, Gender, LockField, Record, RulesDataset, Skill, Spell,
    SpellBucket, StructuralChange,
};

use super::notifier::{CharacterObserver, Notifier};
use super::randomizer::Randomizer;

/// An entry for a picker: record id and display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerOption {
    pub id: String,
    pub label: String,
}

impl PickerOption {
    fn from_record(record: &impl Record) -> Self {
        Self {
            id: record.index().to_string(),
            label: record.name().to_string(),
        }
    }
}

fn sorted_options(mut options: Vec<PickerOption>) -> Vec<PickerOption> {
    options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
    options
}

/// Owns one draft and its choice groups over a shared rules dataset.
pub struct CharacterBuilder {
    pub(super) dataset: Arc<dyn RulesDataset>,
    pub(super) draft: CharacterDraft,
    pub(super) choice_groups: BTreeMap<String, ChoiceGroup>,
    pub(super) notifier: Notifier,
}

impl CharacterBuilder {
    pub fn new(dataset: Arc<dyn RulesDataset>) -> Self {
        let mut builder = Self {
            dataset,
            draft: CharacterDraft::new(),
            choice_groups: BTreeMap::new(),
            notifier: Notifier::new(),
        };
        builder
            .draft
            .refresh(builder.dataset.as_ref(), &mut builder.choice_groups);
        builder
    }

    pub fn subscribe(&mut self, observer: Arc<dyn CharacterObserver>) {
        self.notifier.subscribe(observer);
    }

    /// Suspends notifications until the returned guard is dropped. Events
    /// raised meanwhile are delivered once, when the outermost guard ends.
    pub fn batch(&mut self) -> BatchGuard<'_> {
        self.notifier.suspend();
        BatchGuard { builder: self }
    }

    // =========================================================================
    // Read surface
    // =========================================================================

    pub fn dataset(&self) -> &dyn RulesDataset {
        self.dataset.as_ref()
    }

    pub fn draft(&self) -> &CharacterDraft {
        &self.draft
    }

    pub fn derived(&self) -> &DerivedStats {
        self.draft.derived()
    }

    pub fn choice_groups(&self) -> &BTreeMap<String, ChoiceGroup> {
        &self.choice_groups
    }

    pub fn choice_group(&self, id: &str) -> Option<&ChoiceGroup> {
        self.choice_groups.get(id)
    }

    pub fn effective_skills(&self) -> BTreeSet<Skill> {
        self.draft.effective_grants().skills
    }

    pub fn effective_languages(&self) -> BTreeSet<String> {
        self.draft.effective_grants().languages
    }

    pub fn effective_tools(&self) -> BTreeSet<String> {
        self.draft.effective_grants().tools
    }

    pub fn saving_throw_proficiencies(&self) -> BTreeSet<Ability> {
        self.draft.effective_grants().saving_throws
    }

    pub fn ability_breakdown(&self) -> Vec<AbilityBreakdown> {
        self.draft.ability_breakdown()
    }

    pub fn race_options(&self) -> Vec<PickerOption> {
        sorted_options(self.dataset.races().iter().map(PickerOption::from_record).collect())
    }

    pub fn subrace_options(&self) -> Vec<PickerOption> {
        let Some(race) = self.draft.race().and_then(|id| self.dataset.race(id)) else {
            return Vec::new();
        };
        sorted_options(race.subraces.iter().map(PickerOption::from_record).collect())
    }

    pub fn class_options(&self) -> Vec<PickerOption> {
        sorted_options(self.dataset.classes().iter().map(PickerOption::from_record).collect())
    }

    pub fn subclass_options(&self) -> Vec<PickerOption> {
        let Some(class) = self.draft.class().and_then(|id| self.dataset.class(id)) else {
            return Vec::new();
        };
        sorted_options(class.subclasses.iter().map(PickerOption::from_record).collect())
    }

    pub fn background_options(&self) -> Vec<PickerOption> {
        sorted_options(
            self.dataset
                .backgrounds()
                .iter()
                .map(PickerOption::from_record)
                .collect(),
        )
    }

    pub fn alignment_options(&self) -> Vec<PickerOption> {
        sorted_options(
            self.dataset
                .alignments()
                .iter()
                .map(PickerOption::from_record)
                .collect(),
        )
    }

    /// Spells on the current class and subclass lists, keyed by spell level
    /// and sorted by name within a level.
    pub fn spells_by_level(&self) -> BTreeMap<u8, Vec<&Spell>> {
        let Some(class) = self.draft.class() else {
            return BTreeMap::new();
        };
        let mut spells = self.dataset.spells_for_class(class);
        if let Some(subclass) = self.draft.subclass() {
            spells.extend(self.dataset.spells_for_subclass(subclass));
        }

        let mut seen = BTreeSet::new();
        let mut grouped: BTreeMap<u8, Vec<&Spell>> = BTreeMap::new();
        for spell in spells {
            if seen.insert(spell.index.as_str()) {
                grouped.entry(spell.level).or_default().push(spell);
            }
        }
        for spells in grouped.values_mut() {
            spells.sort_by(|a, b| a.name.cmp(&b.name));
        }
        grouped
    }

    pub fn is_spell_selected(&self, bucket: SpellBucket, spell: &str) -> bool {
        self.draft
            .spells()
            .contains(bucket, &spell.trim().to_lowercase())
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// A blank name restores the default and unlocks the field.
    pub fn set_name(&mut self, name: &str) {
        let changed = self.draft.set_name(name);
        let lock_changed = self.lock(LockField::Name, !name.trim().is_empty());
        self.commit("name", changed || lock_changed);
    }

    /// Clamps into 1..=20 and always locks the level.
    pub fn set_level(&mut self, level: i64) {
        let changed = self.draft.set_level(level);
        let lock_changed = self.lock(LockField::Level, true);
        self.commit("level", changed || lock_changed);
    }

    /// Unknown identifiers are stored as given and resolve to nothing.
    pub fn set_race(&mut self, race: Option<&str>) {
        let key = race.and_then(normalize_identifier);
        let record = key.as_deref().and_then(|k| self.dataset.race(k));
        let id = record.map(|r| r.index.to_lowercase()).or(key);
        let locked = id.is_some();

        let change = self.draft.set_race(id, record);
        let mut lock_changed = self.lock(LockField::Race, locked);
        if let StructuralChange::Changed {
            dependent_cleared: true,
        } = change
        {
            lock_changed |= self.lock(LockField::Subrace, false);
        }
        self.commit("race", change.changed() || lock_changed);
    }

    pub fn set_subrace(&mut self, subrace: Option<&str>) {
        let key = subrace.and_then(normalize_identifier);
        let id = key.map(|key| {
            self.draft
                .race()
                .and_then(|race| self.dataset.race(race))
                .and_then(|race| race.subrace(&key))
                .map(|s| s.index.to_lowercase())
                .unwrap_or(key)
        });
        let locked = id.is_some();
        let changed = self.draft.set_subrace(id);
        let lock_changed = self.lock(LockField::Subrace, locked);
        self.commit("subrace", changed || lock_changed);
    }

    pub fn set_class(&mut self, class: Option<&str>) {
        let key = class.and_then(normalize_identifier);
        let record = key.as_deref().and_then(|k| self.dataset.class(k));
        let id = record.map(|c| c.index.to_lowercase()).or(key);
        let locked = id.is_some();

        let change = self.draft.set_class(id, record);
        let mut lock_changed = self.lock(LockField::Class, locked);
        if let StructuralChange::Changed {
            dependent_cleared: true,
        } = change
        {
            lock_changed |= self.lock(LockField::Subclass, false);
        }
        self.commit("class", change.changed() || lock_changed);
    }

    pub fn set_subclass(&mut self, subclass: Option<&str>) {
        let key = subclass.and_then(normalize_identifier);
        let id = key.map(|key| {
            self.draft
                .class()
                .and_then(|class| self.dataset.class(class))
                .and_then(|class| class.subclass(&key))
                .map(|s| s.index.to_lowercase())
                .unwrap_or(key)
        });
        let locked = id.is_some();
        let changed = self.draft.set_subclass(id);
        let lock_changed = self.lock(LockField::Subclass, locked);
        self.commit("subclass", changed || lock_changed);
    }

    pub fn set_background(&mut self, background: Option<&str>) {
        let key = background.and_then(normalize_identifier);
        let id = key.map(|key| {
            self.dataset
                .background(&key)
                .map(|b| b.index.to_lowercase())
                .unwrap_or(key)
        });
        let locked = id.is_some();
        let changed = self.draft.set_background(id);
        let lock_changed = self.lock(LockField::Background, locked);
        self.commit("background", changed || lock_changed);
    }

    pub fn set_alignment(&mut self, alignment: Option<&str>) {
        let key = alignment.and_then(normalize_identifier);
        let id = key.map(|key| {
            self.dataset
                .alignment(&key)
                .map(|a| a.index.to_lowercase())
                .unwrap_or(key)
        });
        let locked = id.is_some();
        let changed = self.draft.set_alignment(id);
        let lock_changed = self.lock(LockField::Alignment, locked);
        self.commit("alignment", changed || lock_changed);
    }

    /// Only "male" and "female" are kept; anything else clears the field.
    pub fn set_gender(&mut self, gender: Option<&str>) {
        let gender = gender.and_then(Gender::parse);
        let changed = self.draft.set_gender(gender);
        let lock_changed = self.lock(LockField::Gender, gender.is_some());
        self.commit("gender", changed || lock_changed);
    }

    // =========================================================================
    // Abilities
    // =========================================================================

    /// Scores clamp into 1..=30; unknown abilities are rejected.
    pub fn set_base_score(&mut self, ability: &str, score: i32) -> Result<(), DomainError> {
        let ability: Ability = ability.parse()?;
        let changed = self.draft.set_base_score(ability, score);
        let lock_changed = self.lock(LockField::Abilities, true);
        self.commit("base_score", changed || lock_changed);
        Ok(())
    }

    pub fn set_manual_bonus(&mut self, ability: &str, bonus: i32) -> Result<(), DomainError> {
        let ability: Ability = ability.parse()?;
        let changed = self.draft.set_manual_bonus(ability, bonus)?;
        let lock_changed = self.lock(LockField::Abilities, true);
        self.commit("manual_bonus", changed || lock_changed);
        Ok(())
    }

    /// `None` clears the override.
    pub fn set_manual_hit_points(&mut self, hit_points: Option<i32>) -> Result<(), DomainError> {
        let changed = self.draft.set_manual_hit_points(hit_points)?;
        let lock_changed = hit_points.is_some() && self.lock(LockField::Abilities, true);
        self.commit("manual_hit_points", changed || lock_changed);
        Ok(())
    }

    /// Back to all-10 base scores with no manual adjustments.
    pub fn reset_abilities(&mut self) {
        let changed = self.draft.reset_abilities();
        let lock_changed = self.lock(LockField::Abilities, false);
        self.commit("reset_abilities", changed || lock_changed);
    }

    // =========================================================================
    // Proficiencies and choices
    // =========================================================================

    pub fn toggle_skill(&mut self, skill: &str, enabled: bool) -> Result<(), DomainError> {
        let skill: Skill = skill.parse()?;
        let changed = self.draft.toggle_skill(skill, enabled);
        let lock_changed = self.lock(LockField::Skills, self.draft.has_skill_selections());
        self.commit("skill", changed || lock_changed);
        Ok(())
    }

    /// Expertise implies proficiency in the same skill.
    pub fn toggle_expertise(&mut self, skill: &str, enabled: bool) -> Result<(), DomainError> {
        let skill: Skill = skill.parse()?;
        let changed = self.draft.toggle_expertise(skill, enabled);
        let lock_changed = self.lock(LockField::Skills, self.draft.has_skill_selections());
        self.commit("expertise", changed || lock_changed);
        Ok(())
    }

    pub fn toggle_language(&mut self, language: &str, enabled: bool) -> Result<(), DomainError> {
        let id = self.resolve_language(language)?;
        let changed = self.draft.toggle_language(&id, enabled);
        self.commit("language", changed);
        Ok(())
    }

    pub fn toggle_tool(&mut self, tool: &str, enabled: bool) -> Result<(), DomainError> {
        let key = normalize_identifier(tool)
            .ok_or_else(|| DomainError::validation("Tool id cannot be empty"))?;
        let id = self
            .dataset
            .proficiency(&key)
            .map(|p| p.index.to_lowercase())
            .unwrap_or(key);
        let changed = self.draft.toggle_tool(&id, enabled);
        self.commit("tool", changed);
        Ok(())
    }

    /// Stores the legal part of `ids`, truncated lexicographically to the
    /// group's cardinality.
    pub fn set_choice_selection<I, S>(&mut self, group_id: &str, ids: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let group = self
            .choice_groups
            .get(group_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("ChoiceGroup", group_id))?;
        let changed = self.draft.set_choice_selection(&group, ids);
        let lock_changed = self.lock(LockField::Choices, self.draft.has_choice_selections());
        self.commit("choice_selection", changed || lock_changed);
        Ok(())
    }

    // =========================================================================
    // Spells, equipment, currency, text
    // =========================================================================

    /// Preparing an unknown spell also learns it; forgetting a spell also
    /// unprepares it.
    pub fn toggle_spell(
        &mut self,
        bucket: SpellBucket,
        spell: &str,
        enabled: bool,
    ) -> Result<(), DomainError> {
        let key = normalize_identifier(spell)
            .ok_or_else(|| DomainError::validation("Spell id cannot be empty"))?;
        let id = self
            .dataset
            .spell(&key)
            .map(|s| s.index.to_lowercase())
            .unwrap_or(key);
        let changed = self.draft.toggle_spell(bucket, &id, enabled);
        let has_spells = !self.draft.spells().known().is_empty();
        let lock_changed = self.lock(LockField::Spells, has_spells);
        self.commit("spell", changed || lock_changed);
        Ok(())
    }

    pub fn add_equipment(&mut self, item: &str) -> Result<(), DomainError> {
        self.draft.add_equipment(item)?;
        self.lock(LockField::Equipment, true);
        self.commit("add_equipment", true);
        Ok(())
    }

    /// Removes the entry at `position` and returns it.
    pub fn remove_equipment(&mut self, position: usize) -> Result<String, DomainError> {
        let removed = self.draft.remove_equipment(position)?;
        let has_items = !self.draft.equipment().is_empty();
        self.lock(LockField::Equipment, has_items);
        self.commit("remove_equipment", true);
        Ok(removed)
    }

    pub fn set_equipment<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let changed = self.draft.set_equipment(items);
        let has_items = !self.draft.equipment().is_empty();
        let lock_changed = self.lock(LockField::Equipment, has_items);
        self.commit("equipment", changed || lock_changed);
    }

    pub fn set_currency(&mut self, denomination: &str, amount: u32) -> Result<(), DomainError> {
        let denomination: Denomination = denomination.parse()?;
        let changed = self.draft.set_currency(denomination, amount);
        let has_coins = !self.draft.currency().is_empty();
        let lock_changed = self.lock(LockField::Currency, has_coins);
        self.commit("currency", changed || lock_changed);
        Ok(())
    }

    pub fn set_notes(&mut self, notes: &str) {
        let changed = self.draft.set_notes(notes);
        let lock_changed = self.lock(LockField::Notes, !notes.trim().is_empty());
        self.commit("notes", changed || lock_changed);
    }

    pub fn set_biography(&mut self, biography: &str) {
        let changed = self.draft.set_biography(biography);
        let lock_changed = self.lock(LockField::Biography, !biography.trim().is_empty());
        self.commit("biography", changed || lock_changed);
    }

    /// Explicitly locks or unlocks a field for the randomizer.
    pub fn set_locked(&mut self, field: LockField, locked: bool) {
        let changed = self.lock(field, locked);
        if changed {
            self.notifier.emit(CharacterEvent::StateChanged);
        }
    }

    /// Restores every field, locks included. The dataset handle is kept.
    pub fn reset(&mut self) {
        self.draft.reset();
        let outcome = self
            .draft
            .refresh(self.dataset.as_ref(), &mut self.choice_groups);
        debug!("Character reset");
        self.notifier.emit_all(
            std::iter::once(CharacterEvent::StateChanged)
                .chain(std::iter::once(CharacterEvent::DerivedChanged))
                .chain(outcome.events()),
        );
    }

    // =========================================================================
    // Randomization
    // =========================================================================

    pub fn randomize(&mut self) {
        Randomizer::from_entropy().randomize(self);
    }

    /// Same seed, same dataset, same locks: same character.
    pub fn randomize_with_seed(&mut self, seed: u64) {
        Randomizer::seeded(seed).randomize(self);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn resolve_language(&self, language: &str) -> Result<String, DomainError> {
        let key = normalize_identifier(language)
            .ok_or_else(|| DomainError::validation("Language id cannot be empty"))?;
        Ok(self
            .dataset
            .language(&key)
            .map(|l| l.index.to_lowercase())
            .unwrap_or(key))
    }

    /// Returns whether the lock state changed.
    fn lock(&mut self, field: LockField, locked: bool) -> bool {
        let changed = self.draft.is_locked(field) != locked;
        self.draft.set_locked(field, locked);
        changed
    }

    /// Refreshes the draft and raises the events this mutation warrants.
    fn commit(&mut self, operation: &'static str, changed: bool) {
        let outcome = self
            .draft
            .refresh(self.dataset.as_ref(), &mut self.choice_groups);
        debug!(
            operation,
            changed,
            derived_changed = outcome.derived_changed,
            choice_groups_changed = outcome.choice_groups_changed,
            "Applied character mutation"
        );
        let state = changed.then_some(CharacterEvent::StateChanged);
        self.notifier.emit_all(state.into_iter().chain(outcome.events()));
    }
}

/// Holds notifications back until dropped. See [`CharacterBuilder::batch`].
pub struct BatchGuard<'a> {
    builder: &'a mut CharacterBuilder,
}

impl Deref for BatchGuard<'_> {
    type Target = CharacterBuilder;

    fn deref(&self) -> &Self::Target {
        self.builder
    }
}

impl DerefMut for BatchGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.builder
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.builder.notifier.resume();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sample_dataset;
    use crate::use_cases::character::notifier::MockCharacterObserver;
    use mockall::predicate::eq;

    fn builder() -> CharacterBuilder {
        CharacterBuilder::new(sample_dataset())
    }

    fn expect_events(builder: &mut CharacterBuilder, events: &[(CharacterEvent, usize)]) {
        let mut observer = MockCharacterObserver::new();
        for (event, times) in events {
            observer
                .expect_on_event()
                .with(eq(*event))
                .times(*times)
                .return_const(());
        }
        builder.subscribe(Arc::new(observer));
    }

    #[test]
    fn new_builder_has_defaults() {
        let builder = builder();
        assert_eq!(builder.draft().name(), "New Adventurer");
        assert_eq!(builder.draft().level(), 1);
        assert!(builder.choice_groups().is_empty());
        assert_eq!(builder.derived().armor_class, 10);
        assert!(builder.draft().locks().iter().next().is_none());
    }

    #[test]
    fn setting_a_name_locks_and_blank_unlocks() {
        let mut builder = builder();
        builder.set_name("  Mira  ");
        assert_eq!(builder.draft().name(), "Mira");
        assert!(builder.draft().is_locked(LockField::Name));

        builder.set_name("   ");
        assert_eq!(builder.draft().name(), "New Adventurer");
        assert!(!builder.draft().is_locked(LockField::Name));
    }

    #[test]
    fn race_is_stored_by_index_and_drives_choice_groups() {
        let mut builder = builder();
        builder.set_race(Some("Dwarf"));

        assert_eq!(builder.draft().race(), Some("dwarf"));
        assert!(builder.draft().is_locked(LockField::Race));
        assert_eq!(builder.derived().speed, 25);
        assert!(builder.choice_group("race:dwarf:proficiencies").is_some());
        assert_eq!(builder.draft().abilities().racial[Ability::Con], 2);
        assert!(builder.effective_languages().contains("dwarvish"));
    }

    #[test]
    fn changing_race_clears_an_incompatible_subrace() {
        let mut builder = builder();
        builder.set_race(Some("dwarf"));
        builder.set_subrace(Some("Hill Dwarf"));
        assert_eq!(builder.draft().subrace(), Some("hill-dwarf"));
        assert_eq!(builder.draft().abilities().subrace[Ability::Wis], 1);

        builder.set_race(Some("human"));
        assert_eq!(builder.draft().subrace(), None);
        assert!(!builder.draft().is_locked(LockField::Subrace));
        assert_eq!(builder.draft().abilities().subrace[Ability::Wis], 0);
    }

    #[test]
    fn changing_class_clears_an_incompatible_subclass() {
        let mut builder = builder();
        builder.set_class(Some("wizard"));
        builder.set_subclass(Some("evocation"));
        builder.set_class(Some("fighter"));
        assert_eq!(builder.draft().subclass(), None);

        builder.set_subclass(Some("champion"));
        builder.set_class(Some("fighter"));
        assert_eq!(builder.draft().subclass(), Some("champion"));
    }

    #[test]
    fn unknown_race_is_kept_but_resolves_to_nothing() {
        let mut builder = builder();
        builder.set_race(Some("Warforged"));
        assert_eq!(builder.draft().race(), Some("warforged"));
        assert_eq!(builder.derived().speed, 30);
        assert!(builder.choice_groups().is_empty());
    }

    #[test]
    fn invalid_input_leaves_the_draft_untouched() {
        let mut builder = builder();
        let before = builder.draft().clone();

        assert!(matches!(
            builder.set_base_score("luck", 12),
            Err(DomainError::UnknownAbility(_))
        ));
        assert!(matches!(
            builder.toggle_skill("basket-weaving", true),
            Err(DomainError::UnknownSkill(_))
        ));
        assert!(builder.set_manual_hit_points(Some(0)).is_err());
        assert!(builder.set_manual_bonus("str", 11).is_err());
        assert!(builder.set_currency("doubloons", 3).is_err());
        assert!(builder.remove_equipment(0).is_err());
        assert!(matches!(
            builder.set_choice_selection("race:elf:languages", ["elvish"]),
            Err(DomainError::NotFound { .. })
        ));

        assert_eq!(builder.draft(), &before);
    }

    #[test]
    fn scores_clamp_and_lock_abilities() {
        let mut builder = builder();
        builder.set_base_score("STR", 45).unwrap();
        builder.set_base_score("dexterity", -3).unwrap();

        assert_eq!(builder.draft().abilities().base[Ability::Str], 30);
        assert_eq!(builder.draft().abilities().base[Ability::Dex], 1);
        assert!(builder.draft().is_locked(LockField::Abilities));

        builder.reset_abilities();
        assert_eq!(builder.draft().abilities().base[Ability::Str], 10);
        assert!(!builder.draft().is_locked(LockField::Abilities));
    }

    #[test]
    fn level_clamps_and_always_locks() {
        let mut builder = builder();
        builder.set_level(0);
        assert_eq!(builder.draft().level(), 1);
        assert!(builder.draft().is_locked(LockField::Level));
        builder.set_level(99);
        assert_eq!(builder.draft().level(), 20);
        assert_eq!(builder.derived().proficiency_bonus, 6);
    }

    #[test]
    fn gender_accepts_only_male_or_female() {
        let mut builder = builder();
        builder.set_gender(Some("FEMALE"));
        assert_eq!(builder.draft().gender(), Some(Gender::Female));
        assert!(builder.draft().is_locked(LockField::Gender));

        builder.set_gender(Some("other"));
        assert_eq!(builder.draft().gender(), None);
        assert!(!builder.draft().is_locked(LockField::Gender));
    }

    #[test]
    fn expertise_and_skill_toggles_lock_skills() {
        let mut builder = builder();
        builder.toggle_expertise("stealth", true).unwrap();
        assert!(builder.effective_skills().contains(&Skill::Stealth));
        assert!(builder.draft().is_locked(LockField::Skills));
        // +2 proficiency doubled, DEX 10.
        assert_eq!(builder.derived().skills[&Skill::Stealth], 4);

        builder.toggle_skill("Stealth", false).unwrap();
        assert!(builder.draft().expertise().is_empty());
        assert!(!builder.draft().is_locked(LockField::Skills));
    }

    #[test]
    fn choice_selections_fold_into_effective_sets() {
        let mut builder = builder();
        builder.set_class(Some("fighter"));
        let group_id = "class:fighter:prof-0";
        builder
            .set_choice_selection(group_id, ["skill-perception", "skill-athletics", "skill-history"])
            .unwrap();

        let stored = builder.draft().choice_selection(group_id).unwrap();
        // Lexicographic truncation to choose = 2.
        assert_eq!(
            stored.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["skill-athletics", "skill-history"]
        );
        assert!(builder.effective_skills().contains(&Skill::Athletics));
        assert!(!builder.effective_skills().contains(&Skill::Perception));
        assert!(builder.draft().is_locked(LockField::Choices));

        builder.set_choice_selection(group_id, Vec::<String>::new()).unwrap();
        assert!(!builder.draft().is_locked(LockField::Choices));
    }

    #[test]
    fn selections_survive_unrelated_edits_and_drop_with_their_group() {
        let mut builder = builder();
        builder.set_race(Some("dwarf"));
        builder
            .set_choice_selection("race:dwarf:proficiencies", ["thieves-tools"])
            .unwrap();
        assert!(builder.effective_tools().contains("thieves-tools"));

        builder.set_background(Some("acolyte"));
        builder.set_level(4);
        assert!(builder.draft().choice_selection("race:dwarf:proficiencies").is_some());

        builder.set_race(Some("human"));
        assert!(builder.draft().choice_selection("race:dwarf:proficiencies").is_none());
        assert!(!builder.effective_tools().contains("thieves-tools"));
    }

    #[test]
    fn option_listings_are_sorted_by_label() {
        let mut builder = builder();
        let races: Vec<String> = builder.race_options().into_iter().map(|o| o.label).collect();
        assert_eq!(races, vec!["Dwarf", "Elf", "Human"]);
        assert!(builder.subrace_options().is_empty());

        builder.set_race(Some("elf"));
        assert_eq!(
            builder.subrace_options(),
            vec![PickerOption {
                id: "high-elf".into(),
                label: "High Elf".into()
            }]
        );
        builder.set_class(Some("wizard"));
        assert_eq!(builder.subclass_options().len(), 1);
        assert_eq!(builder.alignment_options().len(), 3);
        assert_eq!(builder.background_options()[0].id, "acolyte");
    }

    #[test]
    fn spells_are_grouped_by_level_and_sorted() {
        let mut builder = builder();
        assert!(builder.spells_by_level().is_empty());

        builder.set_class(Some("wizard"));
        let grouped = builder.spells_by_level();
        let cantrips: Vec<&str> = grouped[&0].iter().map(|s| s.name.as_str()).collect();
        let mut sorted = cantrips.clone();
        sorted.sort();
        assert_eq!(cantrips, sorted);
        assert!(grouped.contains_key(&1));
        assert!(grouped.values().flatten().all(|s| s.index != "cure-wounds"));
    }

    #[test]
    fn spell_toggles_keep_prepared_within_known() {
        let mut builder = builder();
        builder.toggle_spell(SpellBucket::Prepared, "Magic Missile", true).unwrap();
        assert!(builder.is_spell_selected(SpellBucket::Known, "magic-missile"));
        assert!(builder.is_spell_selected(SpellBucket::Prepared, "magic-missile"));
        assert!(builder.draft().is_locked(LockField::Spells));

        builder.toggle_spell(SpellBucket::Known, "magic-missile", false).unwrap();
        assert!(!builder.is_spell_selected(SpellBucket::Prepared, "magic-missile"));
        assert!(!builder.draft().is_locked(LockField::Spells));
    }

    #[test]
    fn equipment_currency_and_text_lock_their_fields() {
        let mut builder = builder();
        builder.add_equipment("Longsword").unwrap();
        builder.add_equipment("shield").unwrap();
        assert_eq!(builder.draft().equipment(), ["longsword", "shield"]);
        assert!(builder.draft().is_locked(LockField::Equipment));
        assert_eq!(builder.remove_equipment(0).unwrap(), "longsword");

        builder.set_currency("GP", 15).unwrap();
        assert_eq!(builder.draft().currency().gp, 15);
        assert!(builder.draft().is_locked(LockField::Currency));

        builder.set_notes("owes the guild");
        builder.set_biography("Born under a red moon.");
        assert!(builder.draft().is_locked(LockField::Notes));
        assert!(builder.draft().is_locked(LockField::Biography));

        builder.set_equipment(Vec::<&str>::new());
        assert!(!builder.draft().is_locked(LockField::Equipment));
    }

    #[test]
    fn languages_and_tools_resolve_through_the_dataset() {
        let mut builder = builder();
        builder.toggle_language("Elvish", true).unwrap();
        builder.toggle_tool("Smith's Tools", true).unwrap();
        assert!(builder.effective_languages().contains("elvish"));
        assert!(builder.effective_tools().contains("smiths-tools"));
        assert!(builder.toggle_language("  ", true).is_err());
    }

    #[test]
    fn manual_hit_points_override_derived_value() {
        let mut builder = builder();
        builder.set_class(Some("fighter"));
        builder.set_manual_hit_points(Some(44)).unwrap();
        assert_eq!(builder.derived().max_hit_points, 44);
        builder.set_manual_hit_points(None).unwrap();
        assert_eq!(builder.derived().max_hit_points, 10);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut builder = builder();
        builder.set_race(Some("dwarf"));
        builder.set_class(Some("fighter"));
        builder.set_level(7);
        builder.reset();

        assert_eq!(builder.draft(), CharacterBuilder::new(sample_dataset()).draft());
        assert!(builder.choice_groups().is_empty());
        assert_eq!(builder.dataset().races().len(), 3);
    }

    #[test]
    fn each_mutation_notifies_once_per_channel() {
        let mut builder = builder();
        expect_events(
            &mut builder,
            &[
                (CharacterEvent::StateChanged, 1),
                (CharacterEvent::DerivedChanged, 1),
                (CharacterEvent::ChoiceGroupsChanged, 1),
            ],
        );
        builder.set_race(Some("dwarf"));
    }

    #[test]
    fn unchanged_value_raises_nothing() {
        let mut builder = builder();
        builder.set_name("Mira");
        expect_events(&mut builder, &[]);
        builder.set_name("Mira");
    }

    #[test]
    fn batch_defers_and_coalesces_until_the_outermost_guard_drops() {
        let mut builder = builder();
        expect_events(
            &mut builder,
            &[
                (CharacterEvent::StateChanged, 1),
                (CharacterEvent::DerivedChanged, 1),
                (CharacterEvent::ChoiceGroupsChanged, 1),
            ],
        );

        let mut outer = builder.batch();
        outer.set_name("Mira");
        {
            let mut inner = outer.batch();
            inner.set_race(Some("elf"));
            inner.set_class(Some("wizard"));
        }
        outer.set_level(3);
        drop(outer);
    }
}
