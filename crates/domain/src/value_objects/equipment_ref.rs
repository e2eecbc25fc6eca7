//! Equipment entries with an optional `+N` magic bonus suffix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An equipment list entry such as `longsword` or `longsword+2`.
///
/// The bonus never changes which catalog record the entry points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquipmentRef {
    pub base: String,
    pub magic_bonus: u8,
}

impl EquipmentRef {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            magic_bonus: 0,
        }
    }

    pub fn with_bonus(mut self, bonus: u8) -> Self {
        self.magic_bonus = bonus;
        self
    }

    /// Splits `id+N`; a suffix that is not a positive integer stays part of the id.
    pub fn parse(entry: &str) -> Self {
        let entry = entry.trim();
        if let Some((base, suffix)) = entry.rsplit_once('+') {
            let (base, suffix) = (base.trim_end(), suffix.trim_start());
            if !base.is_empty() && !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit())
            {
                if let Ok(bonus) = suffix.parse::<u8>() {
                    return Self::new(base).with_bonus(bonus);
                }
            }
        }
        Self::new(entry)
    }
}

impl fmt::Display for EquipmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.magic_bonus > 0 {
            write!(f, "{}+{}", self.base, self.magic_bonus)
        } else {
            f.write_str(&self.base)
        }
    }
}
