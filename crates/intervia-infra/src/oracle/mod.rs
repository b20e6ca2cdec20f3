//! Concrete [`EvaluationOracle`] implementations.
//!
//! [`EvaluationOracle`]: intervia_core::oracle::EvaluationOracle

pub mod heuristic;
pub mod llm;

pub use heuristic::HeuristicOracle;
pub use llm::LlmOracle;
