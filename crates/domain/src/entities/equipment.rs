//! Equipment catalog records.

use serde::{Deserialize, Serialize};

/// Equipment category index that marks weapons.
pub const WEAPON_CATEGORY: &str = "weapon";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub index: String,
    pub name: String,
    /// Equipment category index ("weapon", "armor", "adventuring-gear", ...).
    pub category: String,
    #[serde(default)]
    pub weapon_category: Option<String>,
    #[serde(default)]
    pub armor_category: Option<String>,
}

impl Equipment {
    pub fn new(index: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            category: category.into(),
            weapon_category: None,
            armor_category: None,
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.category.eq_ignore_ascii_case(WEAPON_CATEGORY)
    }
}
