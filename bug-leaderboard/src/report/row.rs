//! Leaderboard rows.

use super::classify::{classify, is_bug, Classification, Priority};
use crate::config::LabelVocabulary;
use crate::store::StoredIssue;

/// Prefixed to the issue cell of issues nobody has touched yet.
pub const ATTENTION_MARKER: &str = "&#x2757;";

/// Separator between entries of a multi-valued cell.
const LINE_BREAK: &str = "</br>";

/// Logins longer than this are rendered in subscript.
const SUB_THRESHOLD: usize = 9;

/// Logins longer than this are rendered in subscript and superscript.
const SUB_SUP_THRESHOLD: usize = 12;

/// One rendered leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub issue: String,
    pub priority: Option<Priority>,
    pub assignees: String,
    pub prs: String,
    pub hint: String,
}

impl LeaderboardRow {
    /// Returns the row's cells in column order.
    #[must_use]
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.issue,
            self.priority.as_ref().map_or("", Priority::as_str),
            &self.assignees,
            &self.prs,
            &self.hint,
        ]
    }
}

/// Renders the leaderboard rows of one partition.
///
/// Non-bug issues are dropped; the rest are rendered and sorted by priority.
#[must_use]
pub fn render_partition(issues: &[StoredIssue], labels: &LabelVocabulary) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = issues
        .iter()
        .filter(|issue| is_bug(issue, labels))
        .map(|issue| render_row(issue, &classify(issue, labels)))
        .collect();
    sort_rows(&mut rows);
    rows
}

/// Renders one classified issue.
#[must_use]
pub fn render_row(issue: &StoredIssue, classification: &Classification) -> LeaderboardRow {
    let link = format!("[#{}]({})", issue.number, issue.url);
    let issue_cell = if classification.needs_attention() {
        format!("{ATTENTION_MARKER}{link}")
    } else {
        link
    };

    LeaderboardRow {
        issue: issue_cell,
        priority: classification.priority,
        assignees: issue
            .assignees
            .iter()
            .map(|login| compact_login(login))
            .collect::<Vec<_>>()
            .join(LINE_BREAK),
        prs: issue
            .linked_prs
            .iter()
            .map(|pr| format!("[#{}]({})", pr.number, pr.url))
            .collect::<Vec<_>>()
            .join(LINE_BREAK),
        hint: hint(issue, classification),
    }
}

/// Stable sort by priority rank. Rows without a priority come first.
pub fn sort_rows(rows: &mut [LeaderboardRow]) {
    rows.sort_by_key(|row| row.priority.as_ref().map_or(0, Priority::rank));
}

/// Shrinks long logins so the assignee column stays narrow.
#[must_use]
pub fn compact_login(login: &str) -> String {
    let length = login.chars().count();
    if length > SUB_SUP_THRESHOLD {
        format!("<sub><sup>@{login}</sup></sub>")
    } else if length > SUB_THRESHOLD {
        format!("<sub>@{login}</sub>")
    } else {
        format!("@{login}")
    }
}

fn hint(issue: &StoredIssue, classification: &Classification) -> String {
    let mut parts = Vec::new();
    if classification.challenge {
        parts.push(if classification.picked {
            "&#x2B50; picked".to_string()
        } else {
            "&#x2665; yes!".to_string()
        });
    }
    if !issue.mentor.is_empty() {
        parts.push(format!("Mentor: @{}", issue.mentor));
    }
    if !issue.score.is_empty() {
        parts.push(format!("Score: {}", issue.score));
    }
    parts.join(LINE_BREAK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LinkedPullRequest;

    fn stored(number: u64, labels: &[&str]) -> StoredIssue {
        StoredIssue {
            id: number as i64,
            number,
            url: format!("https://github.com/pingcap/tidb/issues/{number}"),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            ..StoredIssue::default()
        }
    }

    fn row(number: u64, priority: Option<Priority>) -> LeaderboardRow {
        LeaderboardRow {
            issue: format!("#{number}"),
            priority,
            assignees: String::new(),
            prs: String::new(),
            hint: String::new(),
        }
    }

    #[test]
    fn rows_without_priority_sort_first() {
        let mut rows = vec![
            row(1, Some(Priority::Major)),
            row(2, None),
            row(3, Some(Priority::Critical)),
            row(4, Some(Priority::Minor)),
        ];
        sort_rows(&mut rows);

        let priorities: Vec<Option<Priority>> = rows.iter().map(|r| r.priority).collect();
        assert_eq!(
            priorities,
            vec![
                None,
                Some(Priority::Critical),
                Some(Priority::Major),
                Some(Priority::Minor)
            ]
        );
    }

    #[test]
    fn sort_is_stable_within_a_priority() {
        let mut rows = vec![
            row(1, Some(Priority::Major)),
            row(2, Some(Priority::Critical)),
            row(3, Some(Priority::Major)),
            row(4, None),
            row(5, None),
        ];
        sort_rows(&mut rows);

        let order: Vec<&str> = rows.iter().map(|r| r.issue.as_str()).collect();
        assert_eq!(order, vec!["#4", "#5", "#2", "#1", "#3"]);
    }

    #[test]
    fn non_bug_issues_are_excluded() {
        let mut feature = stored(1, &["type/feature", "severity/critical"]);
        feature.assignees = vec!["dev".to_string()];
        let issues = vec![feature, stored(2, &["type/bug"])];

        let rows = render_partition(&issues, &LabelVocabulary::default());

        assert_eq!(rows.len(), 1);
        assert!(rows[0].issue.contains("[#2]"));
    }

    #[test]
    fn untouched_issue_gets_attention_marker() {
        let rows = render_partition(&[stored(7, &["type/bug"])], &LabelVocabulary::default());
        assert_eq!(
            rows[0].issue,
            "&#x2757;[#7](https://github.com/pingcap/tidb/issues/7)"
        );
    }

    #[test]
    fn assigned_issue_has_no_attention_marker() {
        let mut issue = stored(7, &["type/bug"]);
        issue.assignees = vec!["dev".to_string()];

        let rows = render_partition(&[issue], &LabelVocabulary::default());

        assert_eq!(rows[0].issue, "[#7](https://github.com/pingcap/tidb/issues/7)");
        assert_eq!(rows[0].assignees, "@dev");
    }

    #[test]
    fn picked_or_linked_issues_have_no_attention_marker() {
        let picked = stored(1, &["type/bug", "picked"]);
        let mut linked = stored(2, &["type/bug"]);
        linked.linked_prs = vec![LinkedPullRequest {
            number: 9,
            url: "https://github.com/pingcap/tidb/pull/9".to_string(),
        }];

        let rows = render_partition(&[picked, linked], &LabelVocabulary::default());

        assert!(rows.iter().all(|r| !r.issue.starts_with(ATTENTION_MARKER)));
        assert_eq!(rows[1].prs, "[#9](https://github.com/pingcap/tidb/pull/9)");
    }

    #[test]
    fn long_logins_are_compacted() {
        assert_eq!(compact_login("short"), "@short");
        assert_eq!(compact_login("ninechars"), "@ninechars");
        assert_eq!(compact_login("tenchars10"), "<sub>@tenchars10</sub>");
        assert_eq!(compact_login("twelvechars1"), "<sub>@twelvechars1</sub>");
        assert_eq!(
            compact_login("thirteenchars"),
            "<sub><sup>@thirteenchars</sup></sub>"
        );
    }

    #[test]
    fn multiple_assignees_are_joined_by_line_break() {
        let mut issue = stored(1, &["type/bug"]);
        issue.assignees = vec!["alice".to_string(), "averyverylongname".to_string()];

        let rows = render_partition(&[issue], &LabelVocabulary::default());

        assert_eq!(
            rows[0].assignees,
            "@alice</br><sub><sup>@averyverylongname</sup></sub>"
        );
    }

    #[test]
    fn hint_combines_challenge_status_with_mentor_and_score() {
        let mut open_challenge = stored(1, &["type/bug", "challenge-program"]);
        open_challenge.mentor = "abc".to_string();
        open_challenge.score = "300".to_string();
        let mut taken_challenge = stored(2, &["type/bug", "challenge-program"]);
        taken_challenge.assignees = vec!["dev".to_string()];
        let plain = stored(3, &["type/bug"]);

        let rows = render_partition(
            &[open_challenge, taken_challenge, plain],
            &LabelVocabulary::default(),
        );

        assert_eq!(rows[0].hint, "&#x2665; yes!</br>Mentor: @abc</br>Score: 300");
        assert_eq!(rows[1].hint, "&#x2B50; picked");
        assert_eq!(rows[2].hint, "");
    }

    #[test]
    fn cells_follow_column_order() {
        let row = LeaderboardRow {
            issue: "i".to_string(),
            priority: Some(Priority::Moderate),
            assignees: "a".to_string(),
            prs: "p".to_string(),
            hint: "h".to_string(),
        };
        assert_eq!(row.cells(), ["i", "moderate", "a", "p", "h"]);
    }
}
