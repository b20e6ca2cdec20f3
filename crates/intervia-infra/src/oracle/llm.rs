//! LLM-backed oracle over the Anthropic Messages API.
//!
//! Every call requests strict JSON output; scores are validated at this
//! boundary through [`Evaluation::validated`], so an out-of-range or
//! empty response becomes an [`OracleError`] before it can reach a
//! session.

use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

use intervia_types::answer::{Answer, Evaluation};
use intervia_types::config::InterviewConfig;
use intervia_types::error::OracleError;
use intervia_types::question::{Difficulty, Question};

use intervia_core::oracle::EvaluationOracle;

use crate::llm::LlmClient;

const INTERVIEWER_SYSTEM: &str = "You are a technical interviewer for a full-stack \
    software engineering role. Respond with valid JSON only, no prose outside the \
    JSON object.";

#[derive(Debug, Deserialize)]
struct QuestionPayload {
    question: String,
}

#[derive(Debug, Deserialize)]
struct ScorePayload {
    score: i64,
    feedback: String,
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    score: i64,
    summary: String,
}

pub struct LlmOracle {
    client: LlmClient,
    config: InterviewConfig,
}

impl LlmOracle {
    pub fn new(api_key: SecretString, config: &InterviewConfig) -> Self {
        let client = LlmClient::new(api_key, config.model.clone(), config.max_retries);
        Self {
            client,
            config: config.clone(),
        }
    }
}

impl EvaluationOracle for LlmOracle {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate_question(
        &self,
        difficulty: Difficulty,
        slot: usize,
    ) -> Result<Question, OracleError> {
        let prompt = format!(
            "Generate one {difficulty}-difficulty technical interview question for a \
             full-stack software engineering candidate. This is variant {slot} for this \
             difficulty; make it distinct from other variants. \
             Return JSON: {{\"question\": \"<the question text>\"}}"
        );
        let payload: QuestionPayload = self.client.call_json(INTERVIEWER_SYSTEM, &prompt).await?;
        let text = payload.question.trim();
        if text.is_empty() {
            return Err(OracleError::Parse(
                "model returned an empty question".to_string(),
            ));
        }
        debug!(%difficulty, slot, "Question generated");
        Ok(Question::new(
            text,
            difficulty,
            self.config.time_limit_for(difficulty),
        ))
    }

    async fn score_answer(
        &self,
        question: &Question,
        answer_text: &str,
        elapsed_secs: u64,
    ) -> Result<Evaluation, OracleError> {
        let prompt = format!(
            "Score this interview answer from 0 to 100 and give one or two sentences \
             of feedback.\n\nQuestion ({} difficulty, {}s limit): {}\n\n\
             Answer (submitted after {}s): {}\n\n\
             An empty or off-topic answer scores near 0. \
             Return JSON: {{\"score\": <0-100>, \"feedback\": \"<feedback>\"}}",
            question.difficulty,
            question.time_limit_secs,
            question.prompt,
            elapsed_secs,
            if answer_text.is_empty() {
                "(no answer given)"
            } else {
                answer_text
            },
        );
        let payload: ScorePayload = self.client.call_json(INTERVIEWER_SYSTEM, &prompt).await?;
        Evaluation::validated(payload.score, payload.feedback)
    }

    async fn summarize(&self, answers: &[Answer]) -> Result<Evaluation, OracleError> {
        let mut digest = String::new();
        for (index, answer) in answers.iter().enumerate() {
            digest.push_str(&format!(
                "Q{} score {}/100: {}\n",
                index + 1,
                answer.score,
                answer.evaluation.as_deref().unwrap_or("(no feedback)"),
            ));
        }
        let prompt = format!(
            "An interview of {} questions has finished. Per-question results:\n{digest}\n\
             Produce an overall score from 0 to 100 and a short hiring summary of the \
             candidate's strengths and weaknesses. \
             Return JSON: {{\"score\": <0-100>, \"summary\": \"<summary>\"}}",
            answers.len(),
        );
        let payload: SummaryPayload = self.client.call_json(INTERVIEWER_SYSTEM, &prompt).await?;
        Evaluation::validated(payload.score, payload.summary)
    }
}
