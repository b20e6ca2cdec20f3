//! Infrastructure implementations for Intervia.
//!
//! Provides the concrete edges of the system: resume text extraction and
//! contact-field mining (`resume`), the Anthropic Messages API client
//! (`llm`), and the two [`EvaluationOracle`] implementations (`oracle`) —
//! one backed by the LLM client, one a deterministic offline scorer.
//!
//! [`EvaluationOracle`]: intervia_core::oracle::EvaluationOracle

pub mod llm;
pub mod oracle;
pub mod resume;
