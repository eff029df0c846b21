//! Shared primitive types used across the generator.

use serde::{Deserialize, Serialize};

/// Subject identifier, 1..=n_subjects.
pub type SubjectId = u32;

/// Days since the subject's baseline.
pub type Day = f64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    /// 0 = female, 1 = male. Multiplies the male offsets in the value model.
    pub fn indicator(&self) -> u8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }

    pub fn from_indicator(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Female),
            1 => Some(Self::Male),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}
