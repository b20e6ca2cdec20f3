//! Candidate contact information collected before the interview starts.

use serde::{Deserialize, Serialize};

use std::fmt;

/// One of the three contact fields collected during info-collection.
///
/// The variant order is the order in which missing fields are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Phone,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactField::Name => write!(f, "name"),
            ContactField::Email => write!(f, "email"),
            ContactField::Phone => write!(f, "phone"),
        }
    }
}

/// Contact details for the interviewed candidate.
///
/// All fields are optional until the info-collection phase closes; fields
/// are only ever filled in, never overwritten, by resume extraction or the
/// chat intake heuristics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CandidateInfo {
    /// Fill in any fields still missing from `partial`, leaving already
    /// confirmed fields untouched.
    pub fn merge_partial(&mut self, partial: CandidateInfo) {
        if self.name.is_none() {
            self.name = partial.name;
        }
        if self.email.is_none() {
            self.email = partial.email;
        }
        if self.phone.is_none() {
            self.phone = partial.phone;
        }
    }

    /// Fields still missing, in the deterministic prompt order
    /// (name, then email, then phone).
    pub fn missing_fields(&self) -> Vec<ContactField> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push(ContactField::Name);
        }
        if self.email.is_none() {
            missing.push(ContactField::Email);
        }
        if self.phone.is_none() {
            missing.push(ContactField::Phone);
        }
        missing
    }

    /// Whether all three contact fields are present.
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.email.is_some() && self.phone.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_fills_only_missing_fields() {
        let mut info = CandidateInfo {
            name: Some("Jane Doe".to_string()),
            email: None,
            phone: None,
        };
        info.merge_partial(CandidateInfo {
            name: Some("Resume Name".to_string()),
            email: Some("jane@x.com".to_string()),
            phone: None,
        });
        assert_eq!(info.name.as_deref(), Some("Jane Doe"));
        assert_eq!(info.email.as_deref(), Some("jane@x.com"));
        assert!(info.phone.is_none());
    }

    #[test]
    fn test_missing_fields_order() {
        let info = CandidateInfo::default();
        assert_eq!(
            info.missing_fields(),
            vec![ContactField::Name, ContactField::Email, ContactField::Phone]
        );

        let info = CandidateInfo {
            name: Some("Jane".to_string()),
            email: None,
            phone: None,
        };
        assert_eq!(
            info.missing_fields(),
            vec![ContactField::Email, ContactField::Phone]
        );
    }

    #[test]
    fn test_is_complete() {
        let mut info = CandidateInfo::default();
        assert!(!info.is_complete());
        info.merge_partial(CandidateInfo {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            phone: Some("555-123-4567".to_string()),
        });
        assert!(info.is_complete());
        assert!(info.missing_fields().is_empty());
    }

    #[test]
    fn test_contact_field_display() {
        assert_eq!(ContactField::Name.to_string(), "name");
        assert_eq!(ContactField::Email.to_string(), "email");
        assert_eq!(ContactField::Phone.to_string(), "phone");
    }
}
