//! Interview question types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Question difficulty tier, ordered easiest first.
///
/// The derived `Ord` makes `Easy < Medium < Hard`, which is the order
/// tiers appear in during an interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Default answer time limit for this tier, in seconds.
    pub fn default_time_limit_secs(&self) -> u64 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 60,
            Difficulty::Hard => 120,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("invalid difficulty: '{other}'")),
        }
    }
}

/// A single interview question. Immutable once generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub prompt: String,
    pub difficulty: Difficulty,
    pub time_limit_secs: u64,
}

impl Question {
    /// Create a question with a fresh time-sortable id.
    pub fn new(prompt: impl Into<String>, difficulty: Difficulty, time_limit_secs: u64) -> Self {
        Self {
            id: Uuid::now_v7(),
            prompt: prompt.into(),
            difficulty,
            time_limit_secs,
        }
    }
}
