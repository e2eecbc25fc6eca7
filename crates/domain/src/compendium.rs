//! Rules dataset lookup
//!
//! [`RulesDataset`] is the read-only lookup service every consumer receives at
//! construction time. [`Compendium`] is the in-memory implementation: it is
//! built once (usually by an importer), never mutated afterwards, and can be
//! shared behind an `Arc` by any number of builders.

use std::collections::HashMap;

use crate::entities::{
    Alignment, Background, CharacterClass, Equipment, Language, Proficiency, Race, Record, Spell,
};

/// Read-only access to rules records keyed by identifier.
///
/// Lookups match case-insensitively against either the record index or its
/// display name and return `None` for anything unrecognised.
pub trait RulesDataset: Send + Sync {
    fn race(&self, key: &str) -> Option<&Race>;
    fn class(&self, key: &str) -> Option<&CharacterClass>;
    fn background(&self, key: &str) -> Option<&Background>;
    fn spell(&self, key: &str) -> Option<&Spell>;
    fn equipment(&self, key: &str) -> Option<&Equipment>;
    fn proficiency(&self, key: &str) -> Option<&Proficiency>;
    fn language(&self, key: &str) -> Option<&Language>;
    fn alignment(&self, key: &str) -> Option<&Alignment>;

    /// Listings are ordered by display name.
    fn races(&self) -> &[Race];
    fn classes(&self) -> &[CharacterClass];
    fn backgrounds(&self) -> &[Background];
    fn spells(&self) -> &[Spell];
    fn languages(&self) -> &[Language];
    fn alignments(&self) -> &[Alignment];

    fn spells_for_class(&self, class: &str) -> Vec<&Spell> {
        self.spells()
            .iter()
            .filter(|s| s.available_to_class(class))
            .collect()
    }

    fn spells_for_subclass(&self, subclass: &str) -> Vec<&Spell> {
        self.spells()
            .iter()
            .filter(|s| s.available_to_subclass(subclass))
            .collect()
    }
}

/// Records of one category with index and name lookup tables.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    entries: Vec<T>,
    by_index: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl<T: Record> Collection<T> {
    pub fn new(mut entries: Vec<T>) -> Self {
        entries.sort_by(|a, b| {
            a.name()
                .to_lowercase()
                .cmp(&b.name().to_lowercase())
                .then_with(|| a.index().cmp(b.index()))
        });
        let mut by_index = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            by_index
                .entry(entry.index().to_lowercase())
                .or_insert(position);
            by_name.entry(entry.name().to_lowercase()).or_insert(position);
        }
        Self {
            entries,
            by_index,
            by_name,
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.by_index
            .get(&key)
            .or_else(|| self.by_name.get(&key))
            .and_then(|position| self.entries.get(*position))
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// In-memory rules dataset.
#[derive(Debug, Clone, Default)]
pub struct Compendium {
    races: Collection<Race>,
    classes: Collection<CharacterClass>,
    backgrounds: Collection<Background>,
    spells: Collection<Spell>,
    equipment: Collection<Equipment>,
    proficiencies: Collection<Proficiency>,
    languages: Collection<Language>,
    alignments: Collection<Alignment>,
}

impl Compendium {
    pub fn builder() -> CompendiumBuilder {
        CompendiumBuilder::default()
    }

    pub fn proficiencies(&self) -> &[Proficiency] {
        self.proficiencies.entries()
    }

    pub fn equipment_list(&self) -> &[Equipment] {
        self.equipment.entries()
    }
}

impl RulesDataset for Compendium {
    fn race(&self, key: &str) -> Option<&Race> {
        self.races.get(key)
    }

    fn class(&self, key: &str) -> Option<&CharacterClass> {
        self.classes.get(key)
    }

    fn background(&self, key: &str) -> Option<&Background> {
        self.backgrounds.get(key)
    }

    fn spell(&self, key: &str) -> Option<&Spell> {
        self.spells.get(key)
    }

    fn equipment(&self, key: &str) -> Option<&Equipment> {
        self.equipment.get(key)
    }

    fn proficiency(&self, key: &str) -> Option<&Proficiency> {
        self.proficiencies.get(key)
    }

    fn language(&self, key: &str) -> Option<&Language> {
        self.languages.get(key)
    }

    fn alignment(&self, key: &str) -> Option<&Alignment> {
        self.alignments.get(key)
    }

    fn races(&self) -> &[Race] {
        self.races.entries()
    }

    fn classes(&self) -> &[CharacterClass] {
        self.classes.entries()
    }

    fn backgrounds(&self) -> &[Background] {
        self.backgrounds.entries()
    }

    fn spells(&self) -> &[Spell] {
        self.spells.entries()
    }

    fn languages(&self) -> &[Language] {
        self.languages.entries()
    }

    fn alignments(&self) -> &[Alignment] {
        self.alignments.entries()
    }
}

/// Collects records before indexing them into a [`Compendium`].
#[derive(Debug, Default)]
pub struct CompendiumBuilder {
    races: Vec<Race>,
    classes: Vec<CharacterClass>,
    backgrounds: Vec<Background>,
    spells: Vec<Spell>,
    equipment: Vec<Equipment>,
    proficiencies: Vec<Proficiency>,
    languages: Vec<Language>,
    alignments: Vec<Alignment>,
}

impl CompendiumBuilder {
    pub fn race(mut self, race: Race) -> Self {
        self.races.push(race);
        self
    }

    pub fn class(mut self, class: CharacterClass) -> Self {
        self.classes.push(class);
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.backgrounds.push(background);
        self
    }

    pub fn spell(mut self, spell: Spell) -> Self {
        self.spells.push(spell);
        self
    }

    pub fn equipment(mut self, item: Equipment) -> Self {
        self.equipment.push(item);
        self
    }

    pub fn proficiency(mut self, proficiency: Proficiency) -> Self {
        self.proficiencies.push(proficiency);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.languages.push(language);
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignments.push(alignment);
        self
    }

    pub fn races(mut self, races: impl IntoIterator<Item = Race>) -> Self {
        self.races.extend(races);
        self
    }

    pub fn classes(mut self, classes: impl IntoIterator<Item = CharacterClass>) -> Self {
        self.classes.extend(classes);
        self
    }

    pub fn backgrounds(mut self, backgrounds: impl IntoIterator<Item = Background>) -> Self {
        self.backgrounds.extend(backgrounds);
        self
    }

    pub fn spells(mut self, spells: impl IntoIterator<Item = Spell>) -> Self {
        self.spells.extend(spells);
        self
    }

    pub fn equipment_items(mut self, items: impl IntoIterator<Item = Equipment>) -> Self {
        self.equipment.extend(items);
        self
    }

    pub fn proficiencies(mut self, proficiencies: impl IntoIterator<Item = Proficiency>) -> Self {
        self.proficiencies.extend(proficiencies);
        self
    }

    pub fn languages(mut self, languages: impl IntoIterator<Item = Language>) -> Self {
        self.languages.extend(languages);
        self
    }

    pub fn alignments(mut self, alignments: impl IntoIterator<Item = Alignment>) -> Self {
        self.alignments.extend(alignments);
        self
    }

    pub fn build(self) -> Compendium {
        Compendium {
            races: Collection::new(self.races),
            classes: Collection::new(self.classes),
            backgrounds: Collection::new(self.backgrounds),
            spells: Collection::new(self.spells),
            equipment: Collection::new(self.equipment),
            proficiencies: Collection::new(self.proficiencies),
            languages: Collection::new(self.languages),
            alignments: Collection::new(self.alignments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compendium() -> Compendium {
        Compendium::builder()
            .race(Race::new("human", "Human", 30))
            .race(Race::new("half-elf", "Half-Elf", 30))
            .race(Race::new("dwarf", "Dwarf", 25))
            .spell(Spell::new("fire-bolt", "Fire Bolt", 0).for_classes(&["wizard", "sorcerer"]))
            .spell(Spell::new("cure-wounds", "Cure Wounds", 1).for_classes(&["cleric"]))
            .spell(Spell::new("bless", "Bless", 1).for_subclasses(&["life"]))
            .build()
    }

    #[test]
    fn test_lookup_matches_index_or_name_case_insensitively() {
        let c = compendium();
        assert_eq!(c.race("HUMAN").map(|r| r.speed), Some(30));
        assert_eq!(c.race("Half-Elf").map(|r| r.index.as_str()), Some("half-elf"));
        assert_eq!(c.race(" dwarf ").map(|r| r.speed), Some(25));
        assert!(c.race("tiefling").is_none());
        assert!(c.race("").is_none());
    }

    #[test]
    fn test_listings_are_sorted_by_name() {
        let c = compendium();
        let names: Vec<&str> = c.races().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Dwarf", "Half-Elf", "Human"]);
    }

    #[test]
    fn test_spells_for_class_and_subclass() {
        let c = compendium();
        let wizard: Vec<&str> = c
            .spells_for_class("Wizard")
            .iter()
            .map(|s| s.index.as_str())
            .collect();
        assert_eq!(wizard, vec!["fire-bolt"]);
        assert_eq!(c.spells_for_subclass("life").len(), 1);
        assert!(c.spells_for_class("fighter").is_empty());
    }
}
