//! Async orchestration of the interview session.
//!
//! `InterviewService` owns the session store, the question timer, and the
//! answer buffer, and drives the pure transitions in `machine` around the
//! oracle's async calls. Oracle calls are awaited without holding the
//! store lock; after every await the service re-acquires the store and
//! re-checks session identity and cursor before mutating, so a result
//! that resolves after a discard (or after a replacement session was
//! created) is dropped instead of applied. A scoring slot is claimed
//! before the oracle call, which makes "first accepted wins" hold even
//! when a manual submission and a timer expiry race: the loser is
//! rejected up front, not after a second scoring call.

use intervia_types::candidate::CandidateInfo;
use intervia_types::chat::ChatEntry;
use intervia_types::error::SessionError;
use intervia_types::question::Question;
use intervia_types::session::{InterviewSession, QUESTION_PLAN, SessionStatus};

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::oracle::EvaluationOracle;
use crate::session::machine::{self, AnswerOutcome, InfoOutcome};
use crate::session::store::SessionStore;
use crate::timer::{QuestionTimer, TimerExpired};

/// Capacity of the timer expiry channel. Expiries are one-shot per armed
/// question, so this never fills in practice.
const TIMER_CHANNEL_CAPACITY: usize = 8;

pub struct InterviewService<O: EvaluationOracle> {
    oracle: O,
    store: Mutex<SessionStore>,
    timer: Mutex<QuestionTimer>,
    /// Text to submit on behalf of the candidate when the countdown
    /// expires before a manual submission.
    answer_buffer: Mutex<String>,
    /// When the current question was armed (tokio clock, so tests under a
    /// paused runtime measure elapsed time correctly).
    armed_at: Mutex<Option<tokio::time::Instant>>,
    /// Scoring slot claimed by an in-flight oracle call, keyed by
    /// (session id, cursor).
    in_flight: Mutex<Option<(Uuid, usize)>>,
}

impl<O: EvaluationOracle> InterviewService<O> {
    /// Create a service plus the receiver for timer expiry events. The
    /// caller (CLI loop or test) forwards each received event back into
    /// [`InterviewService::handle_timeout`].
    pub fn new(oracle: O) -> (Self, mpsc::Receiver<TimerExpired>) {
        let (tx, rx) = mpsc::channel(TIMER_CHANNEL_CAPACITY);
        let service = Self {
            oracle,
            store: Mutex::new(SessionStore::new()),
            timer: Mutex::new(QuestionTimer::new(tx)),
            answer_buffer: Mutex::new(String::new()),
            armed_at: Mutex::new(None),
            in_flight: Mutex::new(None),
        };
        (service, rx)
    }

    // --- Lifecycle ---

    /// Start a fresh session, discarding any previous active one.
    pub async fn start_session(&self) -> Uuid {
        self.timer.lock().await.cancel();
        self.armed_at.lock().await.take();
        self.answer_buffer.lock().await.clear();
        self.in_flight.lock().await.take();
        let mut store = self.store.lock().await;
        let session = store.create();
        info!(session_id = %session.id, "Session started");
        session.id
    }

    /// Feed the resume-extraction result (possibly empty) into the
    /// pending session, advancing it to info-collection.
    pub async fn ingest_resume(
        &self,
        partial: CandidateInfo,
    ) -> Result<Vec<ChatEntry>, SessionError> {
        let mut store = self.store.lock().await;
        let session_id = store.active().ok_or(SessionError::NoActiveSession)?.id;
        let session = store.active_mut_for(session_id)?;
        let before = session.transcript.len();
        machine::ingest_resume(session, partial)?;
        Ok(session.transcript[before..].to_vec())
    }

    /// Discard the active session: cancel any pending countdown and drop
    /// the session without archiving. Returns whether one was discarded.
    pub async fn discard(&self) -> bool {
        self.timer.lock().await.cancel();
        self.armed_at.lock().await.take();
        self.answer_buffer.lock().await.clear();
        self.in_flight.lock().await.take();
        self.store.lock().await.discard()
    }

    // --- Inbound events ---

    /// Handle one inbound user message, routed by the session's phase.
    ///
    /// Invariant-guard rejections (no active session, duplicate
    /// submission, stale identity) are swallowed as no-ops: they indicate
    /// a race, not a user mistake.
    pub async fn handle_message(&self, text: &str) -> Result<Vec<ChatEntry>, SessionError> {
        let (session_id, status, finalize_pending) = {
            let store = self.store.lock().await;
            match store.active() {
                Some(session) => (
                    session.id,
                    session.status,
                    session.status == SessionStatus::InProgress
                        && !session.questions.is_empty()
                        && session.answers.len() == session.questions.len(),
                ),
                None => {
                    debug!("Message with no active session ignored");
                    return Ok(Vec::new());
                }
            }
        };

        let result = match status {
            SessionStatus::Pending => {
                debug!(session_id = %session_id, "Message before resume ingestion ignored");
                Ok(Vec::new())
            }
            SessionStatus::InfoCollection => self.handle_info_message(session_id, text).await,
            SessionStatus::InProgress if finalize_pending => self.finalize(session_id).await,
            SessionStatus::InProgress => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(Vec::new());
                }
                let elapsed = self.elapsed_since_armed().await;
                self.score_submission(session_id, None, trimmed.to_string(), elapsed)
                    .await
            }
            // The active slot never holds a completed session; `finish`
            // moves it out in the same transition.
            SessionStatus::Completed => Ok(Vec::new()),
        };
        self.swallow_guard_rejections(result)
    }

    /// Apply a countdown expiry: force-submit whatever answer text is
    /// buffered (possibly nothing) for the question that timed out.
    pub async fn handle_timeout(
        &self,
        event: TimerExpired,
    ) -> Result<Vec<ChatEntry>, SessionError> {
        // Check staleness before consuming the buffer: a late expiry must
        // not steal text the candidate typed for the current question.
        {
            let store = self.store.lock().await;
            let current = store
                .active()
                .filter(|s| s.id == event.session_id && s.status == SessionStatus::InProgress)
                .map(|s| s.cursor);
            if current != Some(event.cursor) {
                debug!(cursor = event.cursor, "Stale countdown expiry ignored");
                return Ok(Vec::new());
            }
        }
        let buffered = std::mem::take(&mut *self.answer_buffer.lock().await);
        let result = self
            .score_submission(event.session_id, Some(event.cursor), buffered, 0)
            .await;
        self.swallow_guard_rejections(result)
    }

    /// Stash partial answer text to be submitted if the countdown expires.
    pub async fn set_answer_buffer(&self, text: &str) {
        let mut buffer = self.answer_buffer.lock().await;
        buffer.clear();
        buffer.push_str(text);
    }

    // --- Read-only views ---

    pub async fn active_session(&self) -> Option<InterviewSession> {
        self.store.lock().await.active().cloned()
    }

    pub async fn completed_sessions(&self) -> Vec<InterviewSession> {
        self.store.lock().await.completed().to_vec()
    }

    /// Seconds left on the current question's countdown.
    pub async fn remaining_secs(&self) -> Option<u64> {
        self.timer.lock().await.remaining_secs()
    }

    // --- Internals ---

    async fn elapsed_since_armed(&self) -> u64 {
        self.armed_at
            .lock()
            .await
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0)
    }

    fn swallow_guard_rejections(
        &self,
        result: Result<Vec<ChatEntry>, SessionError>,
    ) -> Result<Vec<ChatEntry>, SessionError> {
        match result {
            Err(err) if err.is_guard_rejection() => {
                debug!(error = %err, "Guard rejection treated as no-op");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn arm_question(&self, session_id: Uuid, cursor: usize, limit_secs: u64) {
        self.timer.lock().await.arm(session_id, cursor, limit_secs);
        *self.armed_at.lock().await = Some(tokio::time::Instant::now());
        self.answer_buffer.lock().await.clear();
    }

    /// Info-collection message: absorb fields, and on consent generate the
    /// question batch and start the interview.
    async fn handle_info_message(
        &self,
        session_id: Uuid,
        text: &str,
    ) -> Result<Vec<ChatEntry>, SessionError> {
        let (outcome, mut entries) = {
            let mut store = self.store.lock().await;
            let session = store.active_mut_for(session_id)?;
            let before = session.transcript.len();
            let outcome = machine::absorb_chat_message(session, text)?;
            (outcome, session.transcript[before..].to_vec())
        };

        if outcome != InfoOutcome::Consented {
            return Ok(entries);
        }

        // Generate all six questions before anything becomes visible to
        // the session: the batch is installed atomically or not at all.
        let mut questions: Vec<Question> = Vec::with_capacity(QUESTION_PLAN.len());
        for (index, tier) in QUESTION_PLAN.iter().enumerate() {
            match self.oracle.generate_question(*tier, index % 2).await {
                Ok(question) => questions.push(question),
                Err(err) => {
                    warn!(error = %err, tier = %tier, "Question generation failed");
                    let mut store = self.store.lock().await;
                    if let Ok(session) = store.active_mut_for(session_id) {
                        let entry = ChatEntry::system(
                            "Question generation failed. Say \"yes\" again to retry.",
                        );
                        session.push_entry(entry.clone());
                        entries.push(entry);
                    }
                    return Ok(entries);
                }
            }
        }

        let (first_cursor, first_limit) = {
            let mut store = self.store.lock().await;
            let session = match store.active_mut_for(session_id) {
                Ok(session) => session,
                Err(err) => {
                    debug!(error = %err, "Session gone before interview start");
                    return Ok(entries);
                }
            };
            let before = session.transcript.len();
            machine::start_interview(session, questions)?;
            entries.extend_from_slice(&session.transcript[before..]);
            let first = session.current_question().expect("cursor 0 after start");
            (session.cursor, first.time_limit_secs)
        };
        self.arm_question(session_id, first_cursor, first_limit).await;
        info!(session_id = %session_id, "Interview started");
        Ok(entries)
    }

    /// Score one submission. `forced_cursor` is `Some` on the timeout
    /// path, which also means the full time limit counts as elapsed and
    /// an empty answer is still accepted.
    async fn score_submission(
        &self,
        session_id: Uuid,
        forced_cursor: Option<usize>,
        text: String,
        elapsed_secs: u64,
    ) -> Result<Vec<ChatEntry>, SessionError> {
        let forced = forced_cursor.is_some();

        // Validate and claim the scoring slot under the store lock.
        let (question, cursor, elapsed_secs, mut entries) = {
            let mut store = self.store.lock().await;
            let session = store.active_mut_for(session_id)?;
            if session.status != SessionStatus::InProgress {
                return Err(SessionError::WrongPhase {
                    expected: SessionStatus::InProgress,
                    actual: session.status,
                });
            }
            let cursor = session.cursor;
            if let Some(event_cursor) = forced_cursor
                && event_cursor != cursor
            {
                return Err(SessionError::StaleCursor {
                    event: event_cursor,
                    cursor,
                });
            }
            if session.is_answered(cursor) {
                return Err(SessionError::AlreadyAnswered(cursor));
            }
            let mut in_flight = self.in_flight.lock().await;
            if in_flight.is_some() {
                // A submission for this question is already being scored;
                // the first accepted one wins.
                return Err(SessionError::AlreadyAnswered(cursor));
            }
            *in_flight = Some((session_id, cursor));
            drop(in_flight);

            // No open question (all answered, summary pending): nothing
            // to score.
            let Some(question) = session.current_question().cloned() else {
                *self.in_flight.lock().await = None;
                return Err(SessionError::AlreadyAnswered(cursor));
            };
            let elapsed = if forced {
                question.time_limit_secs
            } else {
                elapsed_secs.min(question.time_limit_secs)
            };

            let mut entries = Vec::new();
            if forced {
                let notice = ChatEntry::system("Time's up! Submitting the answer as written.");
                session.push_entry(notice.clone());
                entries.push(notice);
            }
            if !text.is_empty() {
                let echo = ChatEntry::user(text.clone());
                session.push_entry(echo.clone());
                entries.push(echo);
            }
            (question, cursor, elapsed, entries)
        };

        // An accepted submission settles the question; the countdown must
        // never fire for it afterwards.
        self.timer.lock().await.cancel();

        let scored = self
            .oracle
            .score_answer(&question, &text, elapsed_secs)
            .await;
        {
            // Release only our own claim; after a discard a newer session
            // may have claimed the slot while we were waiting.
            let mut in_flight = self.in_flight.lock().await;
            if *in_flight == Some((session_id, cursor)) {
                *in_flight = None;
            }
        }

        let evaluation = match scored {
            Ok(evaluation) => evaluation,
            Err(err) => {
                warn!(error = %err, cursor, "Answer evaluation failed");
                let mut store = self.store.lock().await;
                if let Ok(session) = store.active_mut_for(session_id) {
                    let entry =
                        ChatEntry::system("Error processing answer. Please submit it again.");
                    session.push_entry(entry.clone());
                    entries.push(entry);
                }
                return Ok(entries);
            }
        };

        // Re-check identity after the await: the session may have been
        // discarded or replaced while the oracle was thinking.
        let next = {
            let mut store = self.store.lock().await;
            let session = match store.active_mut_for(session_id) {
                Ok(session) => session,
                Err(err) => {
                    debug!(error = %err, "Dropping late scoring result");
                    return Ok(entries);
                }
            };
            let answer = intervia_types::answer::Answer {
                question_id: question.id,
                text,
                score: evaluation.score,
                elapsed_secs,
                evaluation: Some(evaluation.narrative),
            };
            let before = session.transcript.len();
            let outcome = match machine::record_answer(session, cursor, answer) {
                Ok(outcome) => outcome,
                Err(err) if err.is_guard_rejection() => {
                    debug!(error = %err, "Dropping late scoring result");
                    return Ok(entries);
                }
                Err(err) => return Err(err),
            };
            entries.extend_from_slice(&session.transcript[before..]);
            match outcome {
                AnswerOutcome::Advanced { next } => Some((session.cursor, next.time_limit_secs)),
                AnswerOutcome::LastAnswered => None,
            }
        };

        match next {
            Some((next_cursor, limit)) => {
                self.arm_question(session_id, next_cursor, limit).await;
                Ok(entries)
            }
            None => {
                let mut tail = self.finalize(session_id).await?;
                entries.append(&mut tail);
                Ok(entries)
            }
        }
    }

    /// Summarize a fully answered interview and archive the session.
    ///
    /// Also reachable through `handle_message` when a previous summarize
    /// call failed: any later message retries completion.
    async fn finalize(&self, session_id: Uuid) -> Result<Vec<ChatEntry>, SessionError> {
        let answers = {
            let mut store = self.store.lock().await;
            let session = store.active_mut_for(session_id)?;
            if session.status != SessionStatus::InProgress
                || session.questions.is_empty()
                || session.answers.len() != session.questions.len()
            {
                debug!(session_id = %session_id, "Finalize called before all answers recorded");
                return Ok(Vec::new());
            }
            session.answers.clone()
        };

        match self.oracle.summarize(&answers).await {
            Ok(evaluation) => {
                let mut store = self.store.lock().await;
                let session = match store.active_mut_for(session_id) {
                    Ok(session) => session,
                    Err(err) => {
                        debug!(error = %err, "Dropping late summary result");
                        return Ok(Vec::new());
                    }
                };
                let before = session.transcript.len();
                machine::complete(session, evaluation)?;
                let entries = session.transcript[before..].to_vec();
                store.finish(session_id)?;
                self.timer.lock().await.cancel();
                self.armed_at.lock().await.take();
                Ok(entries)
            }
            Err(err) => {
                warn!(error = %err, "Summary generation failed");
                let mut store = self.store.lock().await;
                let mut entries = Vec::new();
                if let Ok(session) = store.active_mut_for(session_id) {
                    let entry = ChatEntry::system(
                        "Error generating the final summary. Send any message to retry.",
                    );
                    session.push_entry(entry.clone());
                    entries.push(entry);
                }
                Ok(entries)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
    use std::time::Duration;

    use intervia_types::answer::{Answer, Evaluation};
    use intervia_types::error::OracleError;
    use intervia_types::question::Difficulty;

    #[derive(Default)]
    struct StubOracle {
        fail_scoring: AtomicBool,
        fail_summary: AtomicBool,
        scoring_delay_secs: AtomicU64,
        generate_calls: AtomicUsize,
        summarize_calls: AtomicUsize,
    }

    impl EvaluationOracle for StubOracle {
        fn name(&self) -> &str {
            "stub"
        }

        async fn generate_question(
            &self,
            difficulty: Difficulty,
            slot: usize,
        ) -> Result<Question, OracleError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Question::new(
                format!("{difficulty}-{slot}"),
                difficulty,
                difficulty.default_time_limit_secs(),
            ))
        }

        async fn score_answer(
            &self,
            _question: &Question,
            answer_text: &str,
            elapsed_secs: u64,
        ) -> Result<Evaluation, OracleError> {
            let delay = self.scoring_delay_secs.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_secs(delay)).await;
            }
            if self.fail_scoring.load(Ordering::SeqCst) {
                return Err(OracleError::Provider("stub scoring failure".to_string()));
            }
            let score = 40 + answer_text.len().min(60) as i64;
            Evaluation::validated(score, format!("scored after {elapsed_secs}s"))
        }

        async fn summarize(&self, answers: &[Answer]) -> Result<Evaluation, OracleError> {
            self.summarize_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_summary.load(Ordering::SeqCst) {
                return Err(OracleError::Provider("stub summary failure".to_string()));
            }
            let mean = answers.iter().map(|a| u64::from(a.score)).sum::<u64>()
                / answers.len().max(1) as u64;
            Evaluation::validated(mean as i64, format!("{} answers", answers.len()))
        }
    }

    fn service() -> (
        Arc<InterviewService<StubOracle>>,
        mpsc::Receiver<TimerExpired>,
    ) {
        let (service, rx) = InterviewService::new(StubOracle::default());
        (Arc::new(service), rx)
    }

    async fn drive_to_in_progress(service: &InterviewService<StubOracle>) -> Uuid {
        let id = service.start_session().await;
        service.ingest_resume(CandidateInfo::default()).await.unwrap();
        service.handle_message("Jane Doe").await.unwrap();
        service.handle_message("jane@x.com").await.unwrap();
        service.handle_message("555-123-4567").await.unwrap();
        service.handle_message("yes").await.unwrap();
        id
    }

    #[tokio::test(start_paused = true)]
    async fn test_info_collection_walkthrough() {
        let (service, _rx) = service();
        service.start_session().await;
        service.ingest_resume(CandidateInfo::default()).await.unwrap();

        let entries = service.handle_message("Jane Doe").await.unwrap();
        assert!(entries.iter().any(|e| e.content.contains("email")));

        let entries = service.handle_message("jane@x.com").await.unwrap();
        assert!(entries.iter().any(|e| e.content.contains("phone")));

        let entries = service.handle_message("555-123-4567").await.unwrap();
        assert!(entries.iter().any(|e| e.content.contains("yes")));

        let session = service.active_session().await.unwrap();
        assert!(session.info_collected);
        assert_eq!(session.status, SessionStatus::InfoCollection);
        assert_eq!(session.candidate.name.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_consent_generates_six_questions_in_tier_order() {
        let (service, _rx) = service();
        let id = drive_to_in_progress(&service).await;

        let session = service.active_session().await.unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.status, SessionStatus::InProgress);
        assert_eq!(session.cursor, 0);
        assert_eq!(session.questions.len(), 6);
        let tiers: Vec<_> = session.questions.iter().map(|q| q.difficulty).collect();
        assert_eq!(tiers, QUESTION_PLAN.to_vec());
        assert!(session.started_at.is_some());
        assert_eq!(service.oracle.generate_calls.load(Ordering::SeqCst), 6);
        // Countdown armed with the first question's limit.
        assert_eq!(service.remaining_secs().await, Some(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_interview_completes_and_archives() {
        let (service, _rx) = service();
        drive_to_in_progress(&service).await;

        for i in 0..6 {
            let entries = service
                .handle_message("a reasonably detailed answer")
                .await
                .unwrap();
            assert!(entries.iter().any(|e| e.content.starts_with("Score:")));
            if i < 5 {
                let session = service.active_session().await.unwrap();
                assert_eq!(session.cursor, i + 1);
                assert_eq!(session.answers.len(), i + 1);
            }
        }

        assert!(service.active_session().await.is_none());
        let completed = service.completed_sessions().await;
        assert_eq!(completed.len(), 1);
        let session = &completed[0];
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.answers.len(), 6);
        assert!(session.final_score.is_some());
        assert!(session.summary.is_some());
        assert!(session.ended_at.is_some());
        assert_eq!(service.oracle.summarize_calls.load(Ordering::SeqCst), 1);

        // Further messages are no-ops with no active session.
        let entries = service.handle_message("hello?").await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_records_buffered_answer_with_full_limit() {
        let (service, mut rx) = service();
        let id = drive_to_in_progress(&service).await;

        service.set_answer_buffer("half-typed thought").await;
        let fired = rx.recv().await.expect("countdown expiry");
        assert_eq!(fired.session_id, id);
        assert_eq!(fired.cursor, 0);

        let entries = service.handle_timeout(fired).await.unwrap();
        assert!(entries.iter().any(|e| e.content.contains("Time's up")));

        let session = service.active_session().await.unwrap();
        assert_eq!(session.answers.len(), 1);
        assert_eq!(session.answers[0].text, "half-typed thought");
        assert_eq!(session.answers[0].elapsed_secs, 20);
        assert_eq!(session.cursor, 1);
        // Re-armed for the next question.
        assert_eq!(service.remaining_secs().await, Some(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_with_empty_buffer_still_proceeds() {
        let (service, mut rx) = service();
        drive_to_in_progress(&service).await;

        let fired = rx.recv().await.expect("countdown expiry");
        service.handle_timeout(fired).await.unwrap();

        let session = service.active_session().await.unwrap();
        assert_eq!(session.answers.len(), 1);
        assert_eq!(session.answers[0].text, "");
        assert_eq!(session.answers[0].elapsed_secs, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timeout_event_is_noop() {
        let (service, _rx) = service();
        let id = drive_to_in_progress(&service).await;
        service.handle_message("an answer").await.unwrap();

        let session = service.active_session().await.unwrap();
        let answers_before = session.answers.len();
        let transcript_before = session.transcript.len();

        // A stale expiry for the already-answered question 0.
        let entries = service
            .handle_timeout(TimerExpired {
                session_id: id,
                cursor: 0,
            })
            .await
            .unwrap();
        assert!(entries.is_empty());

        let session = service.active_session().await.unwrap();
        assert_eq!(session.answers.len(), answers_before);
        assert_eq!(session.transcript.len(), transcript_before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_manual_answer_is_ignored() {
        let (service, _rx) = service();
        drive_to_in_progress(&service).await;

        let transcript_before = service.active_session().await.unwrap().transcript.len();
        let entries = service.handle_message("   ").await.unwrap();
        assert!(entries.is_empty());

        let session = service.active_session().await.unwrap();
        assert_eq!(session.transcript.len(), transcript_before);
        assert!(session.answers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scoring_failure_leaves_state_unchanged() {
        let (service, _rx) = service();
        drive_to_in_progress(&service).await;

        service.oracle.fail_scoring.store(true, Ordering::SeqCst);
        let entries = service.handle_message("my answer").await.unwrap();
        assert!(
            entries
                .iter()
                .any(|e| e.content.contains("Error processing answer"))
        );

        let session = service.active_session().await.unwrap();
        assert!(session.answers.is_empty());
        assert_eq!(session.cursor, 0);
        assert_eq!(session.status, SessionStatus::InProgress);

        // The same input can simply be submitted again.
        service.oracle.fail_scoring.store(false, Ordering::SeqCst);
        service.handle_message("my answer").await.unwrap();
        let session = service.active_session().await.unwrap();
        assert_eq!(session.answers.len(), 1);
        assert_eq!(session.cursor, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_failure_then_retry_on_next_message() {
        let (service, _rx) = service();
        drive_to_in_progress(&service).await;

        service.oracle.fail_summary.store(true, Ordering::SeqCst);
        for _ in 0..6 {
            service.handle_message("answer text").await.unwrap();
        }

        // All answers recorded, but the session is still active.
        let session = service.active_session().await.unwrap();
        assert_eq!(session.answers.len(), 6);
        assert_eq!(session.status, SessionStatus::InProgress);
        assert!(session.final_score.is_none());

        service.oracle.fail_summary.store(false, Ordering::SeqCst);
        let entries = service.handle_message("try again").await.unwrap();
        assert!(
            entries
                .iter()
                .any(|e| e.content.contains("Interview completed"))
        );
        assert!(service.active_session().await.is_none());
        assert_eq!(service.completed_sessions().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_ignores_late_scoring_result() {
        let (service, _rx) = service();
        drive_to_in_progress(&service).await;

        service.oracle.scoring_delay_secs.store(30, Ordering::SeqCst);
        let racing = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.handle_message("slow answer").await })
        };
        tokio::task::yield_now().await;

        assert!(service.discard().await);
        assert!(service.active_session().await.is_none());

        // Start a replacement session while the old scoring call is still
        // in flight.
        service.start_session().await;
        service.ingest_resume(CandidateInfo::default()).await.unwrap();

        let entries = racing.await.unwrap().unwrap();
        // The late result carried the echoed answer but nothing else.
        assert!(entries.iter().all(|e| !e.content.starts_with("Score:")));

        let session = service.active_session().await.unwrap();
        assert_eq!(session.status, SessionStatus::InfoCollection);
        assert!(session.answers.is_empty());
        assert!(session.transcript.iter().all(|e| e.content != "slow answer"));
        assert!(service.completed_sessions().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_cancels_pending_countdown() {
        let (service, mut rx) = service();
        drive_to_in_progress(&service).await;
        assert!(service.discard().await);

        tokio::select! {
            event = rx.recv() => {
                if event.is_some() {
                    panic!("countdown fired after discard");
                }
            }
            _ = tokio::time::sleep(Duration::from_secs(60)) => {}
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_answers_never_outgrow_questions() {
        let (service, mut rx) = service();
        let id = drive_to_in_progress(&service).await;

        for _ in 0..6 {
            let session = service.active_session().await.unwrap();
            assert!(session.answers.len() <= session.questions.len());
            service.handle_message("answer").await.unwrap();
            // Replay a stale expiry after every answer; none may add more.
            let _ = service
                .handle_timeout(TimerExpired {
                    session_id: id,
                    cursor: 0,
                })
                .await
                .unwrap();
        }
        // Drain whatever expiries were queued; all must be stale no-ops.
        while let Ok(event) = rx.try_recv() {
            let entries = service.handle_timeout(event).await.unwrap();
            assert!(entries.is_empty());
        }
        let completed = service.completed_sessions().await;
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].answers.len(), 6);
        for (answer, question) in completed[0].answers.iter().zip(&completed[0].questions) {
            assert_eq!(answer.question_id, question.id);
        }
    }
}
