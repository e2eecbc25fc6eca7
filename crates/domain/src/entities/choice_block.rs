//! "Choose N of M" blocks as they appear in rules records.

use serde::{Deserialize, Serialize};

/// A named pointer to another rules record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub index: String,
    pub name: String,
}

impl Reference {
    pub fn new(index: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            name: name.into(),
        }
    }
}

/// A single entry in a choice block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "option_type", rename_all = "snake_case")]
pub enum ChoiceEntry {
    /// Pick this record.
    Reference { item: Reference },
    /// Pick from a nested block; flattened into the parent when resolved.
    Choice { choice: ChoiceBlock },
}

impl ChoiceEntry {
    pub fn reference(index: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Reference {
            item: Reference::new(index, name),
        }
    }
}

/// A decision point declared by a race, subrace, class or background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceBlock {
    #[serde(default)]
    pub desc: Option<String>,
    pub choose: u32,
    /// Dataset category hint such as "languages" or "proficiencies".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub options: Vec<ChoiceEntry>,
}

impl ChoiceBlock {
    pub fn new(choose: u32, options: Vec<ChoiceEntry>) -> Self {
        Self {
            desc: None,
            choose,
            kind: None,
            options,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Every referenced record reachable from this block, nested choices
    /// flattened in declaration order.
    pub fn flattened(&self) -> Vec<&Reference> {
        let mut out = Vec::new();
        collect_references(&self.options, &mut out);
        out
    }
}

fn collect_references<'a>(entries: &'a [ChoiceEntry], out: &mut Vec<&'a Reference>) {
    for entry in entries {
        match entry {
            ChoiceEntry::Reference { item } => out.push(item),
            ChoiceEntry::Choice { choice } => collect_references(&choice.options, out),
        }
    }
}
