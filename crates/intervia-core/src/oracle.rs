//! EvaluationOracle trait definition.
//!
//! The oracle is the external scoring and question-generation service,
//! consumed as an opaque asynchronous collaborator. Uses RPITIT (native
//! async fn in traits, Rust 2024 edition) consistent with the rest of the
//! workspace. Implementations live in `intervia-infra`.

use intervia_types::answer::{Answer, Evaluation};
use intervia_types::error::OracleError;
use intervia_types::question::{Difficulty, Question};

/// External question-generation and scoring service.
///
/// Contract: `score_answer` and `summarize` always return a score in
/// [0, 100] and a non-empty narrative (implementations validate through
/// `Evaluation::validated`). Calls may be slow; the session service awaits
/// them without holding the store lock and re-checks session identity
/// afterwards, so a failed or late call can never corrupt session state.
pub trait EvaluationOracle: Send + Sync {
    /// Human-readable oracle name (e.g. "anthropic", "heuristic").
    fn name(&self) -> &str;

    /// Generate the question for one slot of the interview plan.
    ///
    /// Called exactly six times at interview start, in fixed tier order.
    /// `slot` is the zero-based position within the tier (0 or 1).
    fn generate_question(
        &self,
        difficulty: Difficulty,
        slot: usize,
    ) -> impl std::future::Future<Output = Result<Question, OracleError>> + Send;

    /// Score one answer against its question.
    fn score_answer(
        &self,
        question: &Question,
        answer_text: &str,
        elapsed_secs: u64,
    ) -> impl std::future::Future<Output = Result<Evaluation, OracleError>> + Send;

    /// Produce the aggregate score and narrative for a completed interview.
    ///
    /// Called exactly once per session, with the full answer sequence in
    /// question order.
    fn summarize(
        &self,
        answers: &[Answer],
    ) -> impl std::future::Future<Output = Result<Evaluation, OracleError>> + Send;
}
