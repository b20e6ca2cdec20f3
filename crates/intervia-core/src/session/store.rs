//! In-memory session store.
//!
//! Holds the single active `InterviewSession` (or none) plus the list of
//! completed sessions. Mutable access to the active session is guarded by
//! session id, so an operation carrying a stale id (late timer event, late
//! oracle result for a discarded session) is rejected instead of mutating
//! whatever session happens to be active now. The completed list is
//! append-only and preserves insertion order; sorting for display is a
//! read-only view concern outside this store.

use intervia_types::error::SessionError;
use intervia_types::session::{InterviewSession, SessionStatus};

use tracing::info;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct SessionStore {
    active: Option<InterviewSession>,
    completed: Vec<InterviewSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh active session, discarding any previous one.
    pub fn create(&mut self) -> &mut InterviewSession {
        if let Some(old) = self.active.take() {
            info!(session_id = %old.id, "Replacing unfinished session");
        }
        self.active = Some(InterviewSession::new());
        self.active.as_mut().expect("just inserted")
    }

    /// Read-only view of the active session.
    pub fn active(&self) -> Option<&InterviewSession> {
        self.active.as_ref()
    }

    /// Mutable access to the active session, guarded by identity.
    pub fn active_mut_for(
        &mut self,
        session_id: Uuid,
    ) -> Result<&mut InterviewSession, SessionError> {
        match self.active.as_mut() {
            None => Err(SessionError::NoActiveSession),
            Some(session) if session.id != session_id => Err(SessionError::StaleSession {
                event: session_id,
                active: session.id,
            }),
            Some(session) => Ok(session),
        }
    }

    /// Drop the active session without archiving it. Returns whether a
    /// session was actually discarded.
    pub fn discard(&mut self) -> bool {
        match self.active.take() {
            Some(session) => {
                info!(session_id = %session.id, status = %session.status, "Session discarded");
                true
            }
            None => false,
        }
    }

    /// Move the active session into the completed list. The session must
    /// already carry `Completed` status.
    pub fn finish(&mut self, session_id: Uuid) -> Result<(), SessionError> {
        let session = self.active_mut_for(session_id)?;
        if session.status != SessionStatus::Completed {
            return Err(SessionError::WrongPhase {
                expected: SessionStatus::Completed,
                actual: session.status,
            });
        }
        let session = self.active.take().expect("checked above");
        info!(
            session_id = %session.id,
            final_score = session.final_score,
            "Session archived"
        );
        self.completed.push(session);
        Ok(())
    }

    /// Completed sessions, insertion order (most recent last). Immutable
    /// after insertion.
    pub fn completed(&self) -> &[InterviewSession] {
        &self.completed
    }
}
