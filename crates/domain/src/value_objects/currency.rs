use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    Pp,
    Gp,
    Ep,
    Sp,
    Cp,
}

impl Denomination {
    pub const ALL: [Denomination; 5] = [
        Denomination::Pp,
        Denomination::Gp,
        Denomination::Ep,
        Denomination::Sp,
        Denomination::Cp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pp => "pp",
            Self::Gp => "gp",
            Self::Ep => "ep",
            Self::Sp => "sp",
            Self::Cp => "cp",
        }
    }
}

impl FromStr for Denomination {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Denomination::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| DomainError::validation(format!("Unknown currency denomination: {s}")))
    }
}

/// Coins held, one non-negative count per denomination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub pp: u32,
    pub gp: u32,
    pub ep: u32,
    pub sp: u32,
    pub cp: u32,
}

impl Currency {
    pub fn gold(gp: u32) -> Self {
        Self {
            gp,
            ..Self::default()
        }
    }

    pub fn get(&self, denomination: Denomination) -> u32 {
        match denomination {
            Denomination::Pp => self.pp,
            Denomination::Gp => self.gp,
            Denomination::Ep => self.ep,
            Denomination::Sp => self.sp,
            Denomination::Cp => self.cp,
        }
    }

    pub fn set(&mut self, denomination: Denomination, amount: u32) {
        let slot = match denomination {
            Denomination::Pp => &mut self.pp,
            Denomination::Gp => &mut self.gp,
            Denomination::Ep => &mut self.ep,
            Denomination::Sp => &mut self.sp,
            Denomination::Cp => &mut self.cp,
        };
        *slot = amount;
    }

    pub fn is_empty(&self) -> bool {
        Denomination::ALL.iter().all(|d| self.get(*d) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_by_denomination() {
        let mut purse = Currency::default();
        assert!(purse.is_empty());
        purse.set("SP".parse().expect("known"), 12);
        assert_eq!(purse.sp, 12);
        assert!(!purse.is_empty());
        assert!("zz".parse::<Denomination>().is_err());
    }
}
