//! Weighted multi-stage character generation.
//!
//! Stages run in dependency order (class, level, race, subrace, subclass,
//! background, alignment, gender, name) and then fill the dependent parts of
//! the sheet. Locked fields are preserved; the randomizer never changes a
//! lock itself.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use charsmith_domain::generation::{
    class_ability_priorities, is_prepared_caster, loadout_for, magic_bonus_for_level,
    name_table_for, race_fitness, standard_array_scores, subrace_fitness, LEVEL_WEIGHTS,
};
use charsmith_domain::{
    Ability, CharacterClass, CharacterDraft, CharacterEvent, ChoiceGroup, Currency, EquipmentRef,
    Gender, LockField, Race, RulesDataset, Spell, SpellBucket, StructuralChange, Subrace,
};

use super::biography::generate_biography;
use super::builder::CharacterBuilder;

pub struct Randomizer<R: Rng = StdRng> {
    rng: R,
}

impl Randomizer<StdRng> {
    /// Reproducible generation: same seed, dataset and locks give the same
    /// character.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> Randomizer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Fills every unlocked field of the builder's draft. Observers hear one
    /// notification per channel once generation is complete.
    pub fn randomize(&mut self, builder: &mut CharacterBuilder) {
        let dataset = Arc::clone(&builder.dataset);
        let dataset = dataset.as_ref();
        if dataset.classes().is_empty() || dataset.races().is_empty() {
            warn!(
                classes = dataset.classes().len(),
                races = dataset.races().len(),
                "Cannot randomize without races and classes"
            );
            return;
        }

        builder.notifier.suspend();
        let draft = &mut builder.draft;

        // =====================================================================
        // Structural picks
        // =====================================================================

        let Some(class) = self.pick_class(draft, dataset) else {
            builder.notifier.resume();
            return;
        };
        let change = draft.set_class(Some(class.index.to_lowercase()), Some(class));
        release_dependent_lock(draft, change, LockField::Subclass);

        let level = self.pick_level(draft);
        draft.set_level(i64::from(level));

        let priorities = class_ability_priorities(&class.index);
        let Some(race) = self.pick_race(draft, dataset, &priorities) else {
            builder.notifier.resume();
            return;
        };
        let change = draft.set_race(Some(race.index.to_lowercase()), Some(race));
        release_dependent_lock(draft, change, LockField::Subrace);

        let subrace = self.pick_subrace(draft, race, &priorities);
        draft.set_subrace(subrace);

        let subclass = self.pick_subclass(draft, class, level);
        draft.set_subclass(subclass);

        let background = self.pick_background(draft, dataset);
        draft.set_background(background);

        let alignment = self.pick_alignment(draft, dataset);
        draft.set_alignment(alignment);

        if !draft.is_locked(LockField::Gender) {
            let gender = Gender::ALL.choose(&mut self.rng).copied();
            draft.set_gender(gender);
        }

        if !draft.is_locked(LockField::Name) {
            if let Some(name) = self.generate_name(draft.race(), draft.gender()) {
                draft.set_name(&name);
            }
        }

        // =====================================================================
        // Dependent fields
        // =====================================================================

        if !draft.is_locked(LockField::Skills) {
            draft.clear_skills();
        }
        if !draft.is_locked(LockField::Abilities) {
            draft.reset_abilities();
            draft.set_base_scores(standard_array_scores(&priorities));
        }
        if !draft.is_locked(LockField::Notes) {
            draft.set_notes("");
        }
        if !draft.is_locked(LockField::Choices) {
            draft.clear_choice_selections();
        }

        let loadout = loadout_for(&class.index);
        if !draft.is_locked(LockField::Equipment) {
            draft.set_equipment(starting_equipment(dataset, &class.index, level));
        }
        if !draft.is_locked(LockField::Currency) {
            draft.replace_currency(Currency::gold(loadout.gold_at_level(level)));
        }

        // Racial layers and choice groups must reflect the final picks before
        // selections and spells are drawn.
        draft.refresh(dataset, &mut builder.choice_groups);

        let groups: Vec<ChoiceGroup> = builder.choice_groups.values().cloned().collect();
        let choices_locked = draft.is_locked(LockField::Choices);
        for group in &groups {
            self.fill_choice_group(draft, group, choices_locked);
        }

        if !draft.is_locked(LockField::Spells) {
            draft.clear_spells();
            self.fill_spells(draft, dataset, class);
        }

        if !draft.is_locked(LockField::Biography) {
            let biography = generate_biography(draft, dataset, &mut self.rng);
            draft.set_biography(&biography);
        }

        draft.refresh(dataset, &mut builder.choice_groups);

        info!(
            name = draft.name(),
            race = draft.race().unwrap_or_default(),
            class = draft.class().unwrap_or_default(),
            level = draft.level(),
            "Randomized character"
        );

        builder.notifier.emit_all(CharacterEvent::ALL);
        builder.notifier.resume();
    }

    // =========================================================================
    // Stage picks
    // =========================================================================

    fn pick_class<'d>(
        &mut self,
        draft: &CharacterDraft,
        dataset: &'d dyn RulesDataset,
    ) -> Option<&'d CharacterClass> {
        if draft.is_locked(LockField::Class) {
            if let Some(class) = draft.class().and_then(|id| dataset.class(id)) {
                return Some(class);
            }
            debug!(class = ?draft.class(), "Locked class does not resolve, re-rolling");
        }
        dataset.classes().choose(&mut self.rng)
    }

    fn pick_level(&mut self, draft: &CharacterDraft) -> u8 {
        if draft.is_locked(LockField::Level) {
            return draft.level();
        }
        match WeightedIndex::new(LEVEL_WEIGHTS) {
            Ok(distribution) => u8::try_from(distribution.sample(&mut self.rng) + 1).unwrap_or(1),
            Err(e) => {
                warn!(error = %e, "Level weights rejected, defaulting to level 1");
                1
            }
        }
    }

    fn pick_race<'d>(
        &mut self,
        draft: &CharacterDraft,
        dataset: &'d dyn RulesDataset,
        priorities: &[Ability; 6],
    ) -> Option<&'d Race> {
        if draft.is_locked(LockField::Race) {
            if let Some(race) = draft.race().and_then(|id| dataset.race(id)) {
                return Some(race);
            }
            debug!(race = ?draft.race(), "Locked race does not resolve, re-rolling");
        }
        self.weighted_pick(dataset.races(), |race| race_fitness(race, priorities))
    }

    fn pick_subrace(
        &mut self,
        draft: &CharacterDraft,
        race: &Race,
        priorities: &[Ability; 6],
    ) -> Option<String> {
        if draft.is_locked(LockField::Subrace) {
            match draft.subrace() {
                None => return None,
                Some(id) => {
                    if let Some(subrace) = race.subrace(id) {
                        return Some(subrace.index.to_lowercase());
                    }
                }
            }
        }
        self.weighted_pick(&race.subraces, |subrace: &Subrace| {
            subrace_fitness(subrace, priorities)
        })
        .map(|subrace| subrace.index.to_lowercase())
    }

    /// Only subclasses whose first feature arrives by `level` qualify.
    fn pick_subclass(
        &mut self,
        draft: &CharacterDraft,
        class: &CharacterClass,
        level: u8,
    ) -> Option<String> {
        if draft.is_locked(LockField::Subclass) {
            match draft.subclass() {
                None => return None,
                Some(id) => {
                    if let Some(subclass) = class.subclass(id) {
                        return Some(subclass.index.to_lowercase());
                    }
                }
            }
        }
        let eligible: Vec<_> = class
            .subclasses
            .iter()
            .filter(|subclass| subclass.earliest_feature_level() <= level)
            .collect();
        eligible
            .choose(&mut self.rng)
            .map(|subclass| subclass.index.to_lowercase())
    }

    fn pick_background(
        &mut self,
        draft: &CharacterDraft,
        dataset: &dyn RulesDataset,
    ) -> Option<String> {
        if draft.is_locked(LockField::Background) {
            match draft.background() {
                None => return None,
                Some(id) => {
                    if let Some(background) = dataset.background(id) {
                        return Some(background.index.to_lowercase());
                    }
                }
            }
        }
        dataset
            .backgrounds()
            .choose(&mut self.rng)
            .map(|background| background.index.to_lowercase())
    }

    fn pick_alignment(
        &mut self,
        draft: &CharacterDraft,
        dataset: &dyn RulesDataset,
    ) -> Option<String> {
        if draft.is_locked(LockField::Alignment) {
            match draft.alignment() {
                None => return None,
                Some(id) => {
                    if let Some(alignment) = dataset.alignment(id) {
                        return Some(alignment.index.to_lowercase());
                    }
                }
            }
        }
        dataset
            .alignments()
            .choose(&mut self.rng)
            .map(|alignment| alignment.index.to_lowercase())
    }

    fn generate_name(&mut self, race: Option<&str>, gender: Option<Gender>) -> Option<String> {
        let table = name_table_for(race);
        let given = table.given_names(gender).choose(&mut self.rng)?;
        match table.surnames.choose(&mut self.rng) {
            Some(surname) => Some(format!("{given} {surname}")),
            None => Some((*given).to_string()),
        }
    }

    /// Draws proportionally to `fitness`, falling back to a uniform pick when
    /// the weights are unusable.
    fn weighted_pick<'a, T>(&mut self, items: &'a [T], fitness: impl Fn(&T) -> f64) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let weights: Vec<f64> = items.iter().map(fitness).collect();
        match WeightedIndex::new(&weights) {
            Ok(distribution) => items.get(distribution.sample(&mut self.rng)),
            Err(e) => {
                warn!(error = %e, "Fitness weights rejected, picking uniformly");
                items.choose(&mut self.rng)
            }
        }
    }

    // =========================================================================
    // Selections
    // =========================================================================

    /// Unlocked choices get a fresh random subset; locked ones are only
    /// topped up so manual picks survive.
    fn fill_choice_group(&mut self, draft: &mut CharacterDraft, group: &ChoiceGroup, locked: bool) {
        let mut selection: BTreeSet<String> = if locked {
            draft.choice_selection(&group.id).cloned().unwrap_or_default()
        } else {
            BTreeSet::new()
        };
        if selection.len() >= group.choose {
            return;
        }

        let candidates: Vec<&str> = group
            .options
            .iter()
            .map(|option| option.id.as_str())
            .filter(|id| !selection.contains(*id))
            .collect();
        let needed = group.choose - selection.len();
        selection.extend(
            candidates
                .choose_multiple(&mut self.rng, needed.min(candidates.len()))
                .map(|id| (*id).to_string()),
        );
        draft.set_choice_selection(group, selection);
    }

    fn fill_spells(
        &mut self,
        draft: &mut CharacterDraft,
        dataset: &dyn RulesDataset,
        class: &CharacterClass,
    ) {
        let level = draft.level();
        let Some(casting) = class
            .level(level)
            .and_then(|row| row.spellcasting.as_ref())
        else {
            return;
        };

        let mut seen = BTreeSet::new();
        let mut available: Vec<&Spell> = dataset.spells_for_class(&class.index);
        if let Some(subclass) = draft.subclass() {
            available.extend(dataset.spells_for_subclass(subclass));
        }
        available.retain(|spell| seen.insert(spell.index.clone()));

        let cantrips: Vec<&Spell> = available.iter().copied().filter(|s| s.is_cantrip()).collect();
        let cantrip_count = usize::from(casting.cantrips_known.unwrap_or(0)).min(cantrips.len());
        for spell in cantrips.choose_multiple(&mut self.rng, cantrip_count) {
            draft.toggle_spell(SpellBucket::Known, &spell.index, true);
        }

        let slots = casting.positive_slots();
        if slots.is_empty() {
            return;
        }
        let leveled: Vec<&Spell> = available
            .iter()
            .copied()
            .filter(|s| !s.is_cantrip() && slots.contains_key(&s.level))
            .collect();

        if is_prepared_caster(&class.index) {
            let modifier = class
                .spellcasting_ability()
                .map(|ability| draft.abilities().modifier(ability))
                .unwrap_or(0);
            let count = usize::try_from((modifier + i32::from(level)).max(1)).unwrap_or(1);
            for spell in leveled.choose_multiple(&mut self.rng, count.min(leveled.len())) {
                draft.toggle_spell(SpellBucket::Prepared, &spell.index, true);
            }
        } else if let Some(known) = casting.spells_known {
            let count = usize::from(known).min(leveled.len());
            for spell in leveled.choose_multiple(&mut self.rng, count) {
                draft.toggle_spell(SpellBucket::Known, &spell.index, true);
            }
        }
    }
}

/// A re-rolled race or class that dropped its subrace or subclass also frees
/// that field, so the following stage can draw a fresh one.
fn release_dependent_lock(draft: &mut CharacterDraft, change: StructuralChange, field: LockField) {
    if let StructuralChange::Changed {
        dependent_cleared: true,
    } = change
    {
        if draft.is_locked(field) {
            debug!(?field, "Dependent field cleared by re-roll, releasing its lock");
        }
        draft.set_locked(field, false);
    }
}

/// The class loadout, with the level's magic bonus on the first weapon.
fn starting_equipment(dataset: &dyn RulesDataset, class: &str, level: u8) -> Vec<String> {
    let loadout = loadout_for(class);
    let mut items: Vec<String> = loadout.items().map(str::to_string).collect();
    let bonus = magic_bonus_for_level(level);
    if bonus == 0 {
        return items;
    }

    let weapon = items
        .iter()
        .position(|item| dataset.equipment(item).is_some_and(|e| e.is_weapon()))
        .or_else(|| {
            items
                .iter()
                .position(|item| loadout.weapons.contains(&item.as_str()))
        });
    if let Some(position) = weapon {
        items[position] = EquipmentRef::new(items[position].clone())
            .with_bonus(bonus)
            .to_string();
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sample_dataset;
    use charsmith_domain::Skill;

    fn builder() -> CharacterBuilder {
        CharacterBuilder::new(sample_dataset())
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut first = builder();
        let mut second = builder();
        first.randomize_with_seed(7);
        second.randomize_with_seed(7);
        assert_eq!(first.draft(), second.draft());
    }

    #[test]
    fn randomize_is_total_over_many_seeds() {
        for seed in 0..64 {
            let mut builder = builder();
            builder.randomize_with_seed(seed);
            let draft = builder.draft();
            assert!(draft.race().is_some(), "seed {seed}");
            assert!(draft.class().is_some(), "seed {seed}");
            assert!((1..=20).contains(&draft.level()), "seed {seed}");
            assert!(!draft.biography().is_empty(), "seed {seed}");
            assert!(draft.locks().iter().next().is_none(), "seed {seed}");
        }
    }

    #[test]
    fn locked_fields_survive() {
        let mut builder = builder();
        builder.set_name("Tordek");
        builder.set_class(Some("fighter"));
        builder.set_race(Some("dwarf"));
        builder.set_level(2);
        builder.set_base_score("str", 18).unwrap();
        builder.set_notes("keeps a ledger");

        builder.randomize_with_seed(99);

        let draft = builder.draft();
        assert_eq!(draft.name(), "Tordek");
        assert_eq!(draft.class(), Some("fighter"));
        assert_eq!(draft.race(), Some("dwarf"));
        assert_eq!(draft.level(), 2);
        assert_eq!(draft.abilities().base[Ability::Str], 18);
        assert_eq!(draft.notes(), "keeps a ledger");
    }

    #[test]
    fn unlocked_abilities_follow_the_standard_array() {
        let mut builder = builder();
        builder.set_class(Some("wizard"));
        builder.randomize_with_seed(3);

        let mut scores: Vec<i32> = builder
            .draft()
            .abilities()
            .base
            .iter()
            .map(|(_, score)| score)
            .collect();
        scores.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(scores, vec![15, 14, 13, 12, 10, 8]);
        assert_eq!(builder.draft().abilities().base[Ability::Int], 15);
    }

    #[test]
    fn subclass_respects_the_unlock_level() {
        let mut builder = builder();
        builder.set_class(Some("fighter"));
        builder.set_level(2);
        builder.randomize_with_seed(11);
        assert_eq!(builder.draft().subclass(), None);

        builder.set_level(3);
        builder.randomize_with_seed(11);
        assert_eq!(builder.draft().subclass(), Some("champion"));
    }

    #[test]
    fn every_choice_group_is_filled() {
        let mut builder = builder();
        builder.set_class(Some("fighter"));
        builder.set_background(Some("acolyte"));
        builder.randomize_with_seed(5);

        assert!(!builder.choice_groups().is_empty());
        for group in builder.choice_groups().values() {
            let selected = builder.draft().choice_selection(&group.id).map_or(0, |s| s.len());
            assert_eq!(selected, group.choose.min(group.options.len()), "{}", group.id);
        }
    }

    #[test]
    fn locked_choices_are_topped_up_not_replaced() {
        let mut builder = builder();
        builder.set_class(Some("fighter"));
        builder
            .set_choice_selection("class:fighter:prof-0", ["skill-acrobatics"])
            .unwrap();
        builder.randomize_with_seed(21);

        let selection = builder.draft().choice_selection("class:fighter:prof-0").unwrap();
        assert!(selection.contains("skill-acrobatics"));
        assert_eq!(selection.len(), 2);
        assert!(builder.effective_skills().contains(&Skill::Acrobatics));
    }

    #[test]
    fn wizards_get_cantrips_and_prepared_spells() {
        let mut builder = builder();
        builder.set_class(Some("wizard"));
        builder.set_level(1);
        builder.randomize_with_seed(8);

        let spells = builder.draft().spells();
        let cantrips = spells
            .known()
            .iter()
            .filter(|id| builder.dataset().spell(id).is_some_and(|s| s.is_cantrip()))
            .count();
        assert_eq!(cantrips, 3);
        assert!(!spells.prepared().is_empty());
        assert!(spells.prepared().is_subset(spells.known()));
        assert!(spells
            .prepared()
            .iter()
            .all(|id| builder.dataset().spell(id).is_some_and(|s| s.level == 1)));
    }

    #[test]
    fn spells_come_only_from_levels_with_slots() {
        use charsmith_domain::{ClassLevel, Compendium, LevelSpellcasting};

        let warlock = CharacterClass::new("warlock", "Warlock", 8)
            .with_spellcasting(Ability::Cha)
            .with_level(
                ClassLevel::new(3).with_spellcasting(
                    LevelSpellcasting::default()
                        .with_cantrips(1)
                        .with_spells_known(4)
                        .with_slots(&[0, 2]),
                ),
            );
        let dataset = Compendium::builder()
            .race(Race::new("human", "Human", 30))
            .class(warlock)
            .spell(Spell::new("eldritch-blast", "Eldritch Blast", 0).for_classes(&["warlock"]))
            .spell(Spell::new("hex", "Hex", 1).for_classes(&["warlock"]))
            .spell(Spell::new("darkness", "Darkness", 2).for_classes(&["warlock"]))
            .spell(Spell::new("misty-step", "Misty Step", 2).for_classes(&["warlock"]))
            .build();

        let mut builder = CharacterBuilder::new(Arc::new(dataset));
        builder.set_class(Some("warlock"));
        builder.set_level(3);
        builder.randomize_with_seed(5);

        let known: Vec<&str> = builder
            .draft()
            .spells()
            .known()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(known, vec!["darkness", "eldritch-blast", "misty-step"]);
    }

    #[test]
    fn martial_classes_get_no_spells() {
        let mut builder = builder();
        builder.set_class(Some("fighter"));
        builder.randomize_with_seed(13);
        assert!(builder.draft().spells().is_empty());
        assert!(builder.derived().spell_save_dc.is_none());
    }

    #[test]
    fn loadout_and_gold_scale_with_level() {
        let mut builder = builder();
        builder.set_class(Some("fighter"));
        builder.set_level(5);
        builder.randomize_with_seed(2);

        let loadout = loadout_for("fighter");
        assert_eq!(builder.draft().currency().gp, loadout.gold_at_level(5));
        assert!(builder.draft().equipment().iter().any(|item| item.ends_with("+1")));
    }

    #[test]
    fn magic_bonus_goes_on_the_first_weapon() {
        let dataset = sample_dataset();
        let items = starting_equipment(dataset.as_ref(), "fighter", 11);
        let enchanted: Vec<&String> = items.iter().filter(|i| i.contains('+')).collect();
        assert_eq!(enchanted.len(), 1);
        assert!(enchanted[0].ends_with("+2"));

        let plain = starting_equipment(dataset.as_ref(), "fighter", 1);
        assert!(plain.iter().all(|i| !i.contains('+')));
    }

    #[test]
    fn empty_dataset_leaves_the_draft_alone() {
        let mut builder = CharacterBuilder::new(Arc::new(charsmith_domain::Compendium::default()));
        let before = builder.draft().clone();
        builder.randomize_with_seed(1);
        assert_eq!(builder.draft(), &before);
    }
}
