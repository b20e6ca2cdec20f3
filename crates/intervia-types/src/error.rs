use thiserror::Error;
use uuid::Uuid;

use crate::session::SessionStatus;

/// Errors from session transition operations.
///
/// Guard-rejection variants (`AlreadyAnswered`, `StaleSession`,
/// `StaleCursor`, `NoActiveSession`) indicate a race rather than a user
/// mistake; callers treat them as silent no-ops.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active session")]
    NoActiveSession,

    #[error("question {0} already has an answer")]
    AlreadyAnswered(usize),

    #[error("expected status '{expected}', session is '{actual}'")]
    WrongPhase {
        expected: SessionStatus,
        actual: SessionStatus,
    },

    #[error("event targets session {event}, active session is {active}")]
    StaleSession { event: Uuid, active: Uuid },

    #[error("event targets question {event}, cursor is at {cursor}")]
    StaleCursor { event: usize, cursor: usize },

    #[error("expected {expected} questions, generated {actual}")]
    QuestionCount { expected: usize, actual: usize },

    #[error("contact info not yet confirmed")]
    InfoIncomplete,
}

impl SessionError {
    /// Whether this error is an invariant-guard rejection that should be
    /// swallowed (logged at debug) rather than surfaced to the user.
    pub fn is_guard_rejection(&self) -> bool {
        matches!(
            self,
            SessionError::NoActiveSession
                | SessionError::AlreadyAnswered(_)
                | SessionError::StaleSession { .. }
                | SessionError::StaleCursor { .. }
        )
    }
}

/// Errors from evaluation oracle calls.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response parse error: {0}")]
    Parse(String),

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("score {0} is outside [0, 100]")]
    ScoreOutOfRange(i64),

    #[error("oracle returned an empty narrative")]
    EmptyNarrative,
}

/// Errors from the resume ingestion boundary.
#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("unsupported resume format: '{0}'")]
    UnsupportedFormat(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("resume contained no extractable text")]
    EmptyDocument,

    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),
}
