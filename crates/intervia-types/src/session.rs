//! Interview session aggregate and lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::answer::Answer;
use crate::candidate::CandidateInfo;
use crate::chat::ChatEntry;
use crate::question::{Difficulty, Question};

/// Fixed question plan: two questions per tier, tiers in ascending order.
pub const QUESTION_PLAN: [Difficulty; 6] = [
    Difficulty::Easy,
    Difficulty::Easy,
    Difficulty::Medium,
    Difficulty::Medium,
    Difficulty::Hard,
    Difficulty::Hard,
];

/// Lifecycle phase of an interview session.
///
/// Forward transitions never skip a phase; the only backward move is an
/// explicit discard, which destroys the session rather than rewinding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Pending,
    InfoCollection,
    InProgress,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Pending => write!(f, "pending"),
            SessionStatus::InfoCollection => write!(f, "info-collection"),
            SessionStatus::InProgress => write!(f, "in-progress"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SessionStatus::Pending),
            "info-collection" => Ok(SessionStatus::InfoCollection),
            "in-progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Pending
    }
}

/// A single candidate's interview from resume upload to final summary.
///
/// Owned exclusively by the session store while active, and moved (not
/// copied) into the completed list on finish. `answers` grows in lockstep
/// with the cursor: `answers[i]` is always the scored answer to
/// `questions[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub candidate: CandidateInfo,
    pub resume_uploaded: bool,
    pub info_collected: bool,
    /// Index of the question currently awaiting an answer. Equals
    /// `questions.len()` only transiently at completion.
    pub cursor: usize,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
    pub transcript: Vec<ChatEntry>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Set if and only if `status` is `Completed`.
    pub final_score: Option<u8>,
    /// Set if and only if `status` is `Completed`.
    pub summary: Option<String>,
    pub status: SessionStatus,
}

impl InterviewSession {
    /// Create a fresh pending session with empty candidate info.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            candidate: CandidateInfo::default(),
            resume_uploaded: false,
            info_collected: false,
            cursor: 0,
            questions: Vec::new(),
            answers: Vec::new(),
            transcript: Vec::new(),
            started_at: None,
            ended_at: None,
            final_score: None,
            summary: None,
            status: SessionStatus::Pending,
        }
    }

    /// The question at the cursor, if the interview is underway.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// Whether the question at `index` already has a recorded answer.
    pub fn is_answered(&self, index: usize) -> bool {
        index < self.answers.len()
    }

    /// Append an entry to the transcript.
    pub fn push_entry(&mut self, entry: ChatEntry) {
        self.transcript.push(entry);
    }
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            SessionStatus::Pending,
            SessionStatus::InfoCollection,
            SessionStatus::InProgress,
            SessionStatus::Completed,
        ] {
            let parsed: SessionStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_status_serde_kebab_case() {
        let json = serde_json::to_string(&SessionStatus::InfoCollection).unwrap();
        assert_eq!(json, "\"info-collection\"");
        let json = serde_json::to_string(&SessionStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn test_question_plan_shape() {
        assert_eq!(QUESTION_PLAN.len(), 6);
        // Two per tier, ascending.
        assert_eq!(
            QUESTION_PLAN
                .iter()
                .filter(|d| **d == Difficulty::Easy)
                .count(),
            2
        );
        assert!(QUESTION_PLAN.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_new_session_is_pending_and_empty() {
        let session = InterviewSession::new();
        assert_eq!(session.status, SessionStatus::Pending);
        assert!(session.questions.is_empty());
        assert!(session.answers.is_empty());
        assert!(session.current_question().is_none());
        assert!(!session.is_answered(0));
    }
}
