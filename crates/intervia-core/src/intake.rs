//! Contact-intake heuristics for the info-collection phase.
//!
//! A pure function from (existing fields, message text) to (updated fields,
//! next prompt), kept independent of the state machine so it can be tested
//! without simulating chat events. The heuristics are deliberately
//! simplistic content-shape checks: `@` means email, a phone-shaped digit
//! pattern means phone, anything else fills the name if it is still
//! missing. At most one missing field is absorbed per message, and a
//! confirmed field is never overwritten.

use std::sync::LazyLock;

use regex::Regex;

use intervia_types::candidate::{CandidateInfo, ContactField};

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}").expect("phone pattern compiles"));

/// Tokens whose presence in a lowercased message signals consent to begin.
const AFFIRMATIVE_TOKENS: &[&str] = &[
    "yes", "yeah", "yep", "ready", "ok", "okay", "sure", "begin", "start",
];

/// What the interviewer should say next after absorbing a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakePrompt {
    /// A field is still missing; ask for it.
    RequestField(ContactField),
    /// All three fields are present; ask for consent to begin.
    Ready,
}

impl IntakePrompt {
    /// User-facing prompt text.
    pub fn message(&self) -> String {
        match self {
            IntakePrompt::RequestField(field) => {
                format!("Thank you! Please also provide your {field}.")
            }
            IntakePrompt::Ready => {
                "Perfect! All information collected. Ready to start the interview? \
                 Type \"yes\" to begin."
                    .to_string()
            }
        }
    }
}

/// Result of absorbing one inbound message.
#[derive(Debug, Clone)]
pub struct Absorption {
    pub fields: CandidateInfo,
    pub prompt: IntakePrompt,
}

/// Absorb one chat message into the candidate's contact fields.
pub fn absorb_message(fields: &CandidateInfo, message: &str) -> Absorption {
    let text = message.trim();
    let mut updated = fields.clone();

    if updated.email.is_none() && text.contains('@') {
        updated.email = Some(text.to_string());
    } else if updated.phone.is_none() && PHONE_RE.is_match(text) {
        updated.phone = Some(text.to_string());
    } else if updated.name.is_none() && !text.contains('@') && !PHONE_RE.is_match(text) {
        updated.name = Some(text.to_string());
    }

    let prompt = next_prompt(&updated);
    Absorption {
        fields: updated,
        prompt,
    }
}

/// The prompt matching the current field state: the first missing field in
/// deterministic order, or readiness once complete.
pub fn next_prompt(fields: &CandidateInfo) -> IntakePrompt {
    match fields.missing_fields().first() {
        Some(field) => IntakePrompt::RequestField(*field),
        None => IntakePrompt::Ready,
    }
}

/// Whether a message signals affirmative consent to begin the interview.
pub fn is_affirmative(message: &str) -> bool {
    let normalized = message.to_lowercase();
    AFFIRMATIVE_TOKENS
        .iter()
        .any(|token| normalized.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> CandidateInfo {
        CandidateInfo::default()
    }

    #[test]
    fn test_plain_text_fills_name_first() {
        let result = absorb_message(&empty(), "Jane Doe");
        assert_eq!(result.fields.name.as_deref(), Some("Jane Doe"));
        assert_eq!(
            result.prompt,
            IntakePrompt::RequestField(ContactField::Email)
        );
    }

    #[test]
    fn test_at_sign_fills_email() {
        let mut fields = empty();
        fields.name = Some("Jane Doe".to_string());
        let result = absorb_message(&fields, "jane@x.com");
        assert_eq!(result.fields.email.as_deref(), Some("jane@x.com"));
        assert_eq!(
            result.prompt,
            IntakePrompt::RequestField(ContactField::Phone)
        );
    }

    #[test]
    fn test_phone_shape_fills_phone_and_completes() {
        let mut fields = empty();
        fields.name = Some("Jane Doe".to_string());
        fields.email = Some("jane@x.com".to_string());
        let result = absorb_message(&fields, "555-123-4567");
        assert_eq!(result.fields.phone.as_deref(), Some("555-123-4567"));
        assert_eq!(result.prompt, IntakePrompt::Ready);
        assert!(result.fields.is_complete());
    }

    #[test]
    fn test_phone_shape_is_not_mistaken_for_name() {
        // With the name missing, a phone-shaped message still goes to the
        // phone field, not the name.
        let result = absorb_message(&empty(), "555 123 4567");
        assert!(result.fields.name.is_none());
        assert_eq!(result.fields.phone.as_deref(), Some("555 123 4567"));
    }

    #[test]
    fn test_email_shaped_message_never_becomes_name() {
        let mut fields = empty();
        fields.email = Some("set@x.com".to_string());
        let result = absorb_message(&fields, "second@x.com");
        // Email is confirmed, so nothing absorbs; name stays empty.
        assert!(result.fields.name.is_none());
        assert_eq!(result.fields.email.as_deref(), Some("set@x.com"));
    }

    #[test]
    fn test_confirmed_fields_never_overwritten() {
        let fields = CandidateInfo {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            phone: Some("555-123-4567".to_string()),
        };
        let result = absorb_message(&fields, "999-999-9999");
        assert_eq!(result.fields, fields);
        assert_eq!(result.prompt, IntakePrompt::Ready);
    }

    #[test]
    fn test_prompt_order_is_name_email_phone() {
        assert_eq!(
            next_prompt(&empty()),
            IntakePrompt::RequestField(ContactField::Name)
        );
        let mut fields = empty();
        fields.name = Some("Jane".to_string());
        assert_eq!(
            next_prompt(&fields),
            IntakePrompt::RequestField(ContactField::Email)
        );
    }

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("YES please"));
        assert!(is_affirmative("I'm ready"));
        assert!(is_affirmative("let's start"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("maybe later"));
    }

    #[test]
    fn test_prompt_messages() {
        assert!(
            IntakePrompt::RequestField(ContactField::Email)
                .message()
                .contains("email")
        );
        assert!(IntakePrompt::Ready.message().contains("yes"));
    }
}
