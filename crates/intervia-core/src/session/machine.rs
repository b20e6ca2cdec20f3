//! Pure session-transition functions.
//!
//! A closed set of named operations over `&mut InterviewSession`, each
//! validating its preconditions and returning `SessionError` on rejection.
//! There is no ambient state here: callers own the session (via the store)
//! and apply exactly one transition at a time. Every user-visible
//! transition appends timestamped entries to the session transcript.

use intervia_types::answer::Answer;
use intervia_types::candidate::CandidateInfo;
use intervia_types::chat::ChatEntry;
use intervia_types::error::SessionError;
use intervia_types::question::Question;
use intervia_types::session::{InterviewSession, QUESTION_PLAN, SessionStatus};

use chrono::Utc;

use crate::intake::{self, IntakePrompt};

/// Result of absorbing a chat message during info-collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoOutcome {
    /// Empty or whitespace-only input; nothing happened.
    Ignored,
    /// A field may have been absorbed; more fields are still missing.
    Collecting,
    /// All fields present; waiting for the candidate to affirm.
    AwaitingConsent,
    /// The candidate affirmed; the caller should generate questions and
    /// start the interview.
    Consented,
}

/// Result of recording a scored answer.
#[derive(Debug, Clone)]
pub enum AnswerOutcome {
    /// Cursor advanced; the next question was announced and should be armed.
    Advanced { next: Question },
    /// The final question was answered; the caller should summarize.
    LastAnswered,
}

fn require_status(
    session: &InterviewSession,
    expected: SessionStatus,
) -> Result<(), SessionError> {
    if session.status != expected {
        return Err(SessionError::WrongPhase {
            expected,
            actual: session.status,
        });
    }
    Ok(())
}

/// Announce the question at `index`: one ai header entry plus one system
/// entry carrying the prompt text.
fn announce_question(session: &mut InterviewSession, index: usize) {
    let total = session.questions.len();
    let question = &session.questions[index];
    let header = format!(
        "Question {} of {} ({}):",
        index + 1,
        total,
        question.difficulty
    );
    let prompt = question.prompt.clone();
    session.push_entry(ChatEntry::ai(header));
    session.push_entry(ChatEntry::system(prompt));
}

/// pending -> info-collection: merge resume-extracted fields (possibly
/// empty) and advance regardless of completeness.
pub fn ingest_resume(
    session: &mut InterviewSession,
    partial: CandidateInfo,
) -> Result<(), SessionError> {
    require_status(session, SessionStatus::Pending)?;

    session.candidate.merge_partial(partial);
    session.resume_uploaded = true;
    session.status = SessionStatus::InfoCollection;

    session.push_entry(ChatEntry::system("Resume processed."));
    let prompt = intake::next_prompt(&session.candidate);
    if prompt == IntakePrompt::Ready {
        session.info_collected = true;
    }
    session.push_entry(ChatEntry::ai(prompt.message()));
    Ok(())
}

/// info-collection self-loop: absorb one inbound message into the contact
/// fields, or detect consent once collection has closed.
pub fn absorb_chat_message(
    session: &mut InterviewSession,
    text: &str,
) -> Result<InfoOutcome, SessionError> {
    require_status(session, SessionStatus::InfoCollection)?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(InfoOutcome::Ignored);
    }

    session.push_entry(ChatEntry::user(trimmed));

    if session.info_collected {
        if intake::is_affirmative(trimmed) {
            return Ok(InfoOutcome::Consented);
        }
        return Ok(InfoOutcome::AwaitingConsent);
    }

    let absorption = intake::absorb_message(&session.candidate, trimmed);
    session.candidate = absorption.fields;
    session.push_entry(ChatEntry::ai(absorption.prompt.message()));

    if absorption.prompt == IntakePrompt::Ready {
        session.info_collected = true;
        Ok(InfoOutcome::AwaitingConsent)
    } else {
        Ok(InfoOutcome::Collecting)
    }
}

/// info-collection -> in-progress: install the generated question batch,
/// record the start timestamp, and announce the first question.
pub fn start_interview(
    session: &mut InterviewSession,
    questions: Vec<Question>,
) -> Result<(), SessionError> {
    require_status(session, SessionStatus::InfoCollection)?;
    if !session.info_collected {
        return Err(SessionError::InfoIncomplete);
    }
    if questions.len() != QUESTION_PLAN.len() {
        return Err(SessionError::QuestionCount {
            expected: QUESTION_PLAN.len(),
            actual: questions.len(),
        });
    }

    session.questions = questions;
    session.cursor = 0;
    session.started_at = Some(Utc::now());
    session.status = SessionStatus::InProgress;

    session.push_entry(ChatEntry::ai("Great! Let's begin."));
    announce_question(session, 0);
    Ok(())
}

/// in-progress self-loop: record the scored answer for `cursor`, emit the
/// feedback entry, and either advance to the next question or signal that
/// the interview is ready to be summarized.
pub fn record_answer(
    session: &mut InterviewSession,
    cursor: usize,
    answer: Answer,
) -> Result<AnswerOutcome, SessionError> {
    require_status(session, SessionStatus::InProgress)?;
    if cursor != session.cursor {
        return Err(SessionError::StaleCursor {
            event: cursor,
            cursor: session.cursor,
        });
    }
    if session.is_answered(cursor) {
        return Err(SessionError::AlreadyAnswered(cursor));
    }

    let feedback = format!(
        "Score: {}/100. {}",
        answer.score,
        answer.evaluation.as_deref().unwrap_or_default()
    );
    session.answers.push(answer);
    session.push_entry(ChatEntry::ai(feedback));

    session.cursor += 1;
    if session.cursor < session.questions.len() {
        announce_question(session, session.cursor);
        let next = session.questions[session.cursor].clone();
        Ok(AnswerOutcome::Advanced { next })
    } else {
        // Cursor now equals questions.len(), transiently, until `complete`.
        Ok(AnswerOutcome::LastAnswered)
    }
}

/// in-progress -> completed: install the aggregate evaluation and close
/// the session. Requires every question to have an answer.
pub fn complete(
    session: &mut InterviewSession,
    evaluation: intervia_types::answer::Evaluation,
) -> Result<(), SessionError> {
    require_status(session, SessionStatus::InProgress)?;
    if session.answers.len() != session.questions.len() || session.questions.is_empty() {
        return Err(SessionError::QuestionCount {
            expected: session.questions.len(),
            actual: session.answers.len(),
        });
    }

    session.ended_at = Some(Utc::now());
    session.final_score = Some(evaluation.score);
    session.push_entry(ChatEntry::ai(format!(
        "Interview completed! Final score: {}/100. {}",
        evaluation.score, evaluation.narrative
    )));
    session.summary = Some(evaluation.narrative);
    session.status = SessionStatus::Completed;
    Ok(())
}
