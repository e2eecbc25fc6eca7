//! Spell records.

use serde::{Deserialize, Serialize};

/// A spell from the rules dataset.
///
/// Only the fields the builder reasons about are kept: level for slot
/// grouping and the class/subclass lists for availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub index: String,
    pub name: String,
    /// Spell level; 0 is a cantrip.
    pub level: u8,
    #[serde(default)]
    pub school: Option<String>,
    /// Class indices that have this spell on their list.
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub subclasses: Vec<String>,
}

impl Spell {
    pub fn new(index: impl Into<String>, name: impl Into<String>, level: u8) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            level,
            school: None,
            classes: Vec::new(),
            subclasses: Vec::new(),
        }
    }

    pub fn for_classes(mut self, classes: &[&str]) -> Self {
        self.classes = classes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn for_subclasses(mut self, subclasses: &[&str]) -> Self {
        self.subclasses = subclasses.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    pub fn available_to_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c.eq_ignore_ascii_case(class))
    }

    pub fn available_to_subclass(&self, subclass: &str) -> bool {
        self.subclasses.iter().any(|s| s.eq_ignore_ascii_case(subclass))
    }
}
