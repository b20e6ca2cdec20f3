//! Runtime configuration for an interview run.
//!
//! `InterviewConfig` is loaded from an optional TOML file; every field has
//! a default so an empty (or absent) file yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::question::Difficulty;

/// Top-level configuration for Intervia.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewConfig {
    /// Time limit for easy-tier questions, in seconds.
    #[serde(default = "default_easy_limit")]
    pub easy_time_limit_secs: u64,

    /// Time limit for medium-tier questions, in seconds.
    #[serde(default = "default_medium_limit")]
    pub medium_time_limit_secs: u64,

    /// Time limit for hard-tier questions, in seconds.
    #[serde(default = "default_hard_limit")]
    pub hard_time_limit_secs: u64,

    /// Model used by the LLM-backed oracle.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum retry attempts for rate-limited oracle calls.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_easy_limit() -> u64 {
    Difficulty::Easy.default_time_limit_secs()
}

fn default_medium_limit() -> u64 {
    Difficulty::Medium.default_time_limit_secs()
}

fn default_hard_limit() -> u64 {
    Difficulty::Hard.default_time_limit_secs()
}

fn default_model() -> String {
    "claude-sonnet-4-5".to_string()
}

fn default_max_retries() -> u32 {
    3
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            easy_time_limit_secs: default_easy_limit(),
            medium_time_limit_secs: default_medium_limit(),
            hard_time_limit_secs: default_hard_limit(),
            model: default_model(),
            max_retries: default_max_retries(),
        }
    }
}

impl InterviewConfig {
    /// Configured time limit for a difficulty tier, in seconds.
    pub fn time_limit_for(&self, difficulty: Difficulty) -> u64 {
        match difficulty {
            Difficulty::Easy => self.easy_time_limit_secs,
            Difficulty::Medium => self.medium_time_limit_secs,
            Difficulty::Hard => self.hard_time_limit_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = InterviewConfig::default();
        assert_eq!(config.easy_time_limit_secs, 20);
        assert_eq!(config.medium_time_limit_secs, 60);
        assert_eq!(config.hard_time_limit_secs, 120);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let config: InterviewConfig = toml::from_str("").unwrap();
        assert_eq!(config.time_limit_for(Difficulty::Hard), 120);
        assert_eq!(config.model, "claude-sonnet-4-5");
    }

    #[test]
    fn test_deserialize_partial_override() {
        let config: InterviewConfig = toml::from_str(
            r#"
hard_time_limit_secs = 180
model = "claude-haiku-4-5"
"#,
        )
        .unwrap();
        assert_eq!(config.hard_time_limit_secs, 180);
        assert_eq!(config.easy_time_limit_secs, 20);
        assert_eq!(config.model, "claude-haiku-4-5");
    }
}
