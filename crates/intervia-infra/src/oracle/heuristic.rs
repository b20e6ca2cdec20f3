//! Deterministic offline oracle.
//!
//! Scores answers from word count and time-limit adherence, with a small
//! fixed question bank per difficulty tier. Used when no API key is
//! configured, and by integration tests that need reproducible scores.

use intervia_types::answer::{Answer, Evaluation, MAX_SCORE};
use intervia_types::config::InterviewConfig;
use intervia_types::error::OracleError;
use intervia_types::question::{Difficulty, Question};

use intervia_core::oracle::EvaluationOracle;

const EASY_BANK: [&str; 2] = [
    "What is the difference between an array and a linked list, and when would you choose each?",
    "Explain what an HTTP status code is, with examples from the 2xx, 4xx, and 5xx classes.",
];

const MEDIUM_BANK: [&str; 2] = [
    "How would you diagnose and fix a slow database query in a production web application?",
    "Explain how asynchronous I/O differs from thread-per-request concurrency and the trade-offs between them.",
];

const HARD_BANK: [&str; 2] = [
    "Design a system for handling real-time chat with one million concurrent users. Which technologies would you pick and why?",
    "How would you implement authentication and authorization across a microservices architecture?",
];

pub struct HeuristicOracle {
    config: InterviewConfig,
}

impl HeuristicOracle {
    pub fn new(config: &InterviewConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn bank(difficulty: Difficulty) -> &'static [&'static str] {
        match difficulty {
            Difficulty::Easy => &EASY_BANK,
            Difficulty::Medium => &MEDIUM_BANK,
            Difficulty::Hard => &HARD_BANK,
        }
    }
}

impl EvaluationOracle for HeuristicOracle {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn generate_question(
        &self,
        difficulty: Difficulty,
        slot: usize,
    ) -> Result<Question, OracleError> {
        let bank = Self::bank(difficulty);
        let prompt = bank[slot % bank.len()];
        Ok(Question::new(
            prompt,
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
        let word_count = answer_text.split_whitespace().count();
        let base: u8 = if word_count > 100 {
            90
        } else if word_count > 50 {
            70
        } else if word_count > 20 {
            50
        } else {
            30
        };
        let time_bonus: u8 = if elapsed_secs < question.time_limit_secs {
            10
        } else {
            0
        };
        let score = (base + time_bonus).min(MAX_SCORE);

        let depth = if score > 80 {
            "excellent"
        } else if score > 60 {
            "good"
        } else {
            "basic"
        };
        let efficiency = if time_bonus > 0 { "excellent" } else { "adequate" };
        Evaluation::validated(
            i64::from(score),
            format!(
                "Answer demonstrates {depth} understanding. \
                 Word count: {word_count}. Time efficiency: {efficiency}."
            ),
        )
    }

    async fn summarize(&self, answers: &[Answer]) -> Result<Evaluation, OracleError> {
        if answers.is_empty() {
            return Err(OracleError::Provider(
                "no answers to summarize".to_string(),
            ));
        }
        let total: u64 = answers.iter().map(|a| u64::from(a.score)).sum();
        let count = answers.len() as u64;
        // Rounded mean.
        let average = (total + count / 2) / count;

        let performance = if average >= 80 {
            "excellent"
        } else if average >= 60 {
            "good"
        } else {
            "satisfactory"
        };
        Evaluation::validated(
            average as i64,
            format!(
                "The candidate demonstrated {performance} performance across {count} questions. \
                 Average score: {average}/100. Strengths include clear communication and \
                 technical knowledge. Areas for improvement: provide more detailed examples \
                 and consider edge cases."
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn oracle() -> HeuristicOracle {
        HeuristicOracle::new(&InterviewConfig::default())
    }

    fn question(limit: u64) -> Question {
        Question::new("test prompt", Difficulty::Easy, limit)
    }

    fn answer(score: u8) -> Answer {
        Answer {
            question_id: Uuid::now_v7(),
            text: "text".to_string(),
            score,
            elapsed_secs: 10,
            evaluation: None,
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[tokio::test]
    async fn test_question_bank_cycles_per_tier() {
        let oracle = oracle();
        let first = oracle
            .generate_question(Difficulty::Easy, 0)
            .await
            .unwrap();
        let second = oracle
            .generate_question(Difficulty::Easy, 1)
            .await
            .unwrap();
        let third = oracle
            .generate_question(Difficulty::Easy, 2)
            .await
            .unwrap();
        assert_ne!(first.prompt, second.prompt);
        assert_eq!(first.prompt, third.prompt);
        assert_eq!(first.difficulty, Difficulty::Easy);
        assert_eq!(first.time_limit_secs, 20);

        let hard = oracle
            .generate_question(Difficulty::Hard, 0)
            .await
            .unwrap();
        assert_eq!(hard.time_limit_secs, 120);
    }

    #[tokio::test]
    async fn test_word_count_bands() {
        let oracle = oracle();
        let q = question(60);

        // All at the limit, so no time bonus.
        for (count, expected) in [(5, 30), (25, 50), (60, 70), (120, 90)] {
            let eval = oracle
                .score_answer(&q, &words(count), 60)
                .await
                .unwrap();
            assert_eq!(eval.score, expected, "word count {count}");
        }
    }

    #[tokio::test]
    async fn test_time_bonus_only_within_limit() {
        let oracle = oracle();
        let q = question(60);

        let within = oracle.score_answer(&q, &words(25), 30).await.unwrap();
        assert_eq!(within.score, 60);
        assert!(within.narrative.contains("Time efficiency: excellent"));

        let at_limit = oracle.score_answer(&q, &words(25), 60).await.unwrap();
        assert_eq!(at_limit.score, 50);
        assert!(at_limit.narrative.contains("Time efficiency: adequate"));
    }

    #[tokio::test]
    async fn test_score_caps_at_max() {
        let oracle = oracle();
        let q = question(120);
        let eval = oracle.score_answer(&q, &words(150), 30).await.unwrap();
        assert_eq!(eval.score, MAX_SCORE);
    }

    #[tokio::test]
    async fn test_empty_answer_scores_lowest_band() {
        let oracle = oracle();
        let q = question(20);
        let eval = oracle.score_answer(&q, "", 20).await.unwrap();
        assert_eq!(eval.score, 30);
        assert!(eval.narrative.contains("basic"));
    }

    #[tokio::test]
    async fn test_summary_is_rounded_mean_with_band() {
        let oracle = oracle();

        let eval = oracle
            .summarize(&[answer(80), answer(85), answer(90)])
            .await
            .unwrap();
        assert_eq!(eval.score, 85);
        assert!(eval.narrative.contains("excellent"));
        assert!(eval.narrative.contains("across 3 questions"));

        let eval = oracle
            .summarize(&[answer(60), answer(65)])
            .await
            .unwrap();
        assert_eq!(eval.score, 63); // 62.5 rounds up
        assert!(eval.narrative.contains("good"));

        let eval = oracle.summarize(&[answer(30)]).await.unwrap();
        assert!(eval.narrative.contains("satisfactory"));
    }

    #[tokio::test]
    async fn test_summarize_rejects_empty_input() {
        let err = oracle().summarize(&[]).await.unwrap_err();
        assert!(matches!(err, OracleError::Provider(_)));
    }
}
