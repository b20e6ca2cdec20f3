//! Shared domain types for Intervia.
//!
//! Plain data definitions used across the workspace: candidate contact
//! fields, questions and answers, chat transcript entries, the interview
//! session aggregate, configuration, and error enums. No business logic
//! beyond small invariant helpers lives here.

pub mod answer;
pub mod candidate;
pub mod chat;
pub mod config;
pub mod error;
pub mod question;
pub mod session;
