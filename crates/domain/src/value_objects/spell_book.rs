//! Known and prepared spell buckets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellBucket {
    Known,
    Prepared,
}

/// Spell selections. `prepared` is always a subset of `known`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellBook {
    known: BTreeSet<String>,
    prepared: BTreeSet<String>,
}

impl SpellBook {
    pub fn known(&self) -> &BTreeSet<String> {
        &self.known
    }

    pub fn prepared(&self) -> &BTreeSet<String> {
        &self.prepared
    }

    pub fn contains(&self, bucket: SpellBucket, spell: &str) -> bool {
        match bucket {
            SpellBucket::Known => self.known.contains(spell),
            SpellBucket::Prepared => self.prepared.contains(spell),
        }
    }

    /// Adds or removes a spell. Preparing implies knowing; forgetting
    /// implies unpreparing. Returns whether anything changed.
    pub fn toggle(&mut self, bucket: SpellBucket, spell: &str, enabled: bool) -> bool {
        let spell = spell.trim().to_lowercase();
        if spell.is_empty() {
            return false;
        }
        match (bucket, enabled) {
            (SpellBucket::Known, true) => self.known.insert(spell),
            (SpellBucket::Known, false) => {
                let removed = self.known.remove(&spell);
                self.prepared.remove(&spell) || removed
            }
            (SpellBucket::Prepared, true) => {
                let learned = self.known.insert(spell.clone());
                self.prepared.insert(spell) || learned
            }
            (SpellBucket::Prepared, false) => self.prepared.remove(&spell),
        }
    }

    pub fn clear(&mut self) {
        self.known.clear();
        self.prepared.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preparing_unknown_spell_learns_it() {
        let mut book = SpellBook::default();
        assert!(book.toggle(SpellBucket::Prepared, "Bless", true));
        assert!(book.known().contains("bless"));
        assert!(book.prepared().contains("bless"));
    }

    #[test]
    fn test_forgetting_spell_unprepares_it() {
        let mut book = SpellBook::default();
        book.toggle(SpellBucket::Prepared, "bless", true);
        assert!(book.toggle(SpellBucket::Known, "bless", false));
        assert!(book.known().is_empty());
        assert!(book.prepared().is_empty());
    }

    #[test]
    fn test_unpreparing_keeps_spell_known() {
        let mut book = SpellBook::default();
        book.toggle(SpellBucket::Prepared, "bless", true);
        assert!(book.toggle(SpellBucket::Prepared, "bless", false));
        assert!(book.known().contains("bless"));
        assert!(!book.toggle(SpellBucket::Prepared, "bless", false));
    }

    #[test]
    fn test_prepared_stays_subset_under_any_sequence() {
        let mut book = SpellBook::default();
        let ops = [
            (SpellBucket::Known, "a", true),
            (SpellBucket::Prepared, "b", true),
            (SpellBucket::Prepared, "a", true),
            (SpellBucket::Known, "b", false),
            (SpellBucket::Prepared, "c", true),
            (SpellBucket::Known, "a", false),
            (SpellBucket::Known, "c", true),
            (SpellBucket::Prepared, "c", false),
        ];
        for (bucket, spell, enabled) in ops {
            book.toggle(bucket, spell, enabled);
            assert!(book.prepared().is_subset(book.known()));
        }
        assert_eq!(book.known().iter().collect::<Vec<_>>(), vec!["c"]);
    }
}
