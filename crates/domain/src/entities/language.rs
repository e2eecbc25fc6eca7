use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub index: String,
    pub name: String,
    /// "Standard" or "Exotic".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl Language {
    pub fn new(index: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            kind: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub index: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

impl Alignment {
    pub fn new(index: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
            abbreviation: None,
        }
    }
}
