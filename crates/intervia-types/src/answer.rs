//! Answer and evaluation result types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::OracleError;

/// Highest score the oracle may assign.
pub const MAX_SCORE: u8 = 100;

/// A scored answer to one interview question.
///
/// Created exactly once per question when the scoring call resolves, and
/// immutable thereafter. `answers[i]` always refers to `questions[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: Uuid,
    pub text: String,
    /// Score in [0, 100].
    pub score: u8,
    /// Seconds between the question being armed and the answer arriving.
    pub elapsed_secs: u64,
    pub evaluation: Option<String>,
}

/// Result of an oracle call: a score plus a narrative.
///
/// Used both for individual answers and for the final aggregate summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u8,
    pub narrative: String,
}

impl Evaluation {
    /// Build an evaluation, enforcing the oracle contract: score in range
    /// and a non-empty narrative.
    pub fn validated(score: i64, narrative: String) -> Result<Self, OracleError> {
        if !(0..=i64::from(MAX_SCORE)).contains(&score) {
            return Err(OracleError::ScoreOutOfRange(score));
        }
        if narrative.trim().is_empty() {
            return Err(OracleError::EmptyNarrative);
        }
        Ok(Self {
            score: score as u8,
            narrative,
        })
    }
}
