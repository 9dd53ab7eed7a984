//! Extraction of annotated fields from human-written issue bodies.

use regex::Regex;
use std::sync::LazyLock;

/// Matches a `## Score` section holding a number followed by a `## Mentor`
/// section holding an `@handle` list item.
const SCORE_MENTOR_PATTERN: &str = r"## Score\s*?-\s*?(\d+)\s*?## Mentor\s*?\* @(\w+)";

// The pattern is a literal, so compilation cannot fail at runtime.
static SCORE_MENTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SCORE_MENTOR_PATTERN).expect("score/mentor pattern is a valid literal")
});

/// Extracts the score and mentor handle annotated in an issue body.
///
/// When the body carries several score/mentor blocks, the last one wins.
/// A body without a block yields two empty strings.
#[must_use]
pub fn extract_score_and_mentor(body: &str) -> (String, String) {
    SCORE_MENTOR
        .captures_iter(body)
        .last()
        .map(|captures| (captures[1].to_string(), captures[2].to_string()))
        .unwrap_or_default()
}
