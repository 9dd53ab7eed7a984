//! Label names the leaderboard classifies issues by.

use serde::Deserialize;

/// Label vocabulary of the tracked repository.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct LabelVocabulary {
    /// Label marking an issue as a bug. Only bugs make the leaderboard.
    pub bug: String,

    /// Label marking a contribution-challenge item.
    pub challenge: String,

    /// Label marking an issue someone has claimed.
    pub picked: String,

    /// Prefix of the severity labels (`<prefix>critical`, `<prefix>major`, ...).
    pub severity_prefix: String,
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self {
            bug: "type/bug".to_string(),
            challenge: "challenge-program".to_string(),
            picked: "picked".to_string(),
            severity_prefix: "severity/".to_string(),
        }
    }
}
