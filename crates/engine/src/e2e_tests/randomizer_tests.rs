//! E2E tests for randomized characters.

use std::sync::Arc;

use mockall::predicate::eq;

use charsmith_domain::{CharacterEvent, LockField};

use crate::test_fixtures::sample_dataset;
use crate::use_cases::character::MockCharacterObserver;
use crate::use_cases::{CharacterBuilder, Randomizer};

fn builder() -> CharacterBuilder {
    CharacterBuilder::new(sample_dataset())
}

#[test]
fn test_fully_locked_character_keeps_its_structure() {
    let mut builder = builder();
    builder.set_name("Aldric Stonehammer");
    builder.set_level(6);
    builder.set_race(Some("dwarf"));
    builder.set_subrace(Some("hill-dwarf"));
    builder.set_class(Some("fighter"));
    builder.set_subclass(Some("champion"));
    builder.set_background(Some("soldier"));
    builder.set_alignment(Some("lawful-good"));
    builder.set_gender(Some("male"));
    for field in LockField::ALL {
        builder.set_locked(field, true);
    }
    let before = builder.draft().clone();

    for seed in [1, 2, 3] {
        builder.randomize_with_seed(seed);
        let after = builder.draft();
        assert_eq!(after.name(), before.name());
        assert_eq!(after.level(), before.level());
        assert_eq!(after.race(), before.race());
        assert_eq!(after.subrace(), before.subrace());
        assert_eq!(after.class(), before.class());
        assert_eq!(after.subclass(), before.subclass());
        assert_eq!(after.background(), before.background());
        assert_eq!(after.alignment(), before.alignment());
        assert_eq!(after.gender(), before.gender());
        assert_eq!(after.locks(), before.locks());
    }
}

#[test]
fn test_locked_empty_subclass_stays_empty() {
    let mut builder = builder();
    builder.set_class(Some("fighter"));
    builder.set_level(10);
    builder.set_locked(LockField::Subclass, true);

    builder.randomize_with_seed(4);
    assert_eq!(builder.draft().subclass(), None);
}

#[test]
fn test_rerolled_race_frees_its_subrace() {
    let mut rerolled = 0;
    for seed in 0..40 {
        let mut builder = builder();
        builder.set_race(Some("elf"));
        builder.set_subrace(Some("high-elf"));
        builder.set_locked(LockField::Race, false);

        builder.randomize_with_seed(seed);
        let draft = builder.draft();
        let race = draft.race().unwrap().to_string();
        if race == "elf" {
            assert_eq!(draft.subrace(), Some("high-elf"));
            continue;
        }
        rerolled += 1;
        let has_subraces = !builder.dataset().race(&race).unwrap().subraces.is_empty();
        assert!(!draft.is_locked(LockField::Subrace), "seed {seed}");
        assert_eq!(draft.subrace().is_some(), has_subraces, "seed {seed}: {race}");
    }
    assert!(rerolled > 0);
}

#[test]
fn test_rerolled_class_frees_its_subclass() {
    let mut rerolled = 0;
    for seed in 0..40 {
        let mut builder = builder();
        builder.set_level(10);
        builder.set_class(Some("fighter"));
        builder.set_subclass(Some("champion"));
        builder.set_locked(LockField::Class, false);

        builder.randomize_with_seed(seed);
        let draft = builder.draft();
        if draft.class() == Some("fighter") {
            assert_eq!(draft.subclass(), Some("champion"));
            continue;
        }
        rerolled += 1;
        assert_eq!(draft.class(), Some("wizard"));
        assert!(!draft.is_locked(LockField::Subclass), "seed {seed}");
        assert_eq!(draft.subclass(), Some("evocation"), "seed {seed}");

        // A second pass no longer sees a stale lock.
        builder.randomize_with_seed(seed + 1);
        if builder.draft().class() == Some("wizard") {
            assert_eq!(builder.draft().subclass(), Some("evocation"));
        }
    }
    assert!(rerolled > 0);
}

#[test]
fn test_locked_unresolvable_race_is_rerolled() {
    let mut builder = builder();
    builder.set_race(Some("tiefling"));
    assert!(builder.draft().is_locked(LockField::Race));

    builder.randomize_with_seed(17);
    let race = builder.draft().race().unwrap();
    assert!(["dwarf", "elf", "human"].contains(&race));
}

#[test]
fn test_randomize_is_total() {
    for seed in 0..200 {
        let mut builder = builder();
        builder.randomize_with_seed(seed);
        let draft = builder.draft();
        assert!(draft.race().is_some());
        assert!(draft.class().is_some());
        assert!((1..=20).contains(&draft.level()));
        assert!(draft.spells().prepared().is_subset(draft.spells().known()));
        assert!(builder.derived().max_hit_points >= i32::from(draft.level()));
    }
}

#[test]
fn test_randomize_notifies_each_channel_once() {
    let mut builder = builder();
    let mut observer = MockCharacterObserver::new();
    for event in CharacterEvent::ALL {
        observer
            .expect_on_event()
            .with(eq(event))
            .times(1)
            .return_const(());
    }
    builder.subscribe(Arc::new(observer));

    builder.randomize_with_seed(42);
}

#[test]
fn test_randomizer_can_drive_a_builder_directly() {
    let mut first = builder();
    let mut second = builder();
    Randomizer::seeded(123).randomize(&mut first);
    second.randomize_with_seed(123);

    assert_eq!(first.draft(), second.draft());
    assert_eq!(first.choice_groups(), second.choice_groups());
}

#[test]
fn test_randomizing_inside_a_batch_defers_delivery() {
    let mut builder = builder();
    let mut observer = MockCharacterObserver::new();
    observer.expect_on_event().times(3).return_const(());
    builder.subscribe(Arc::new(observer));

    let mut batch = builder.batch();
    batch.randomize_with_seed(9);
    batch.randomize_with_seed(10);
    batch.set_notes("second pass");
}
