//! Clinical classification vocabularies shared by the patient snapshot
//! and the protocol rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Renal function (GFR)
// ---------------------------------------------------------------------------

/// GFR severity class. A is normal function, F is kidney failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenalClass {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl RenalClass {
    pub const ALL: [RenalClass; 6] = [
        RenalClass::A,
        RenalClass::B,
        RenalClass::C,
        RenalClass::D,
        RenalClass::E,
        RenalClass::F,
    ];

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            'F' => Some(Self::F),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
        }
    }
}

impl fmt::Display for RenalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for RenalClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_letter(c).ok_or_else(|| format!("unknown renal class '{trimmed}'"))
            }
            _ => Err(format!("unknown renal class '{trimmed}'")),
        }
    }
}

/// A renal result as reported by the lab: either a measured GFR in mL/min
/// or an already-classified letter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenalValue {
    Numeric(f64),
    Class(RenalClass),
}

impl fmt::Display for RenalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "{v} mL/min"),
            Self::Class(c) => write!(f, "class {c}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Hepatic function (Child-Pugh)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HepaticClass {
    A,
    B,
    C,
}

impl HepaticClass {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
        }
    }
}

impl fmt::Display for HepaticClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for HepaticClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_letter(c).ok_or_else(|| format!("unknown Child-Pugh class '{trimmed}'"))
            }
            _ => Err(format!("unknown Child-Pugh class '{trimmed}'")),
        }
    }
}
