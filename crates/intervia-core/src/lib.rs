//! Business logic for Intervia: the interview session state machine, the
//! per-question countdown timer, the contact-intake heuristics, and the
//! evaluation oracle port.
//!
//! This crate defines the oracle trait that the infrastructure layer
//! implements. It depends only on `intervia-types` -- never on
//! `intervia-infra` or any HTTP/IO crate.

pub mod intake;
pub mod oracle;
pub mod session;
pub mod timer;
