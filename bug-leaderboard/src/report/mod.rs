//! Leaderboard report.
//!
//! Reads the open issues of each partition back out of the database, keeps
//! the bugs, classifies and sorts them, renders one markdown table per
//! partition and merges the tables into a single document.

mod classify;
mod document;
mod error;
mod row;
mod table;

pub use classify::{classify, is_bug, Classification, Priority};
pub use document::{
    create_handlebars_registry, format_timestamp, DocumentRenderer, PartitionSection,
    ReportDocument, DEFAULT_DOCUMENT_TEMPLATE,
};
pub use error::{ReportError, TemplateError};
pub use row::{
    compact_login, render_partition, render_row, sort_rows, LeaderboardRow, ATTENTION_MARKER,
};
pub use table::{render_table, HEADER};

use crate::config::LeaderboardConfig;
use crate::store::Database;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// The rendered report.
#[derive(Debug, Clone)]
pub struct Report {
    /// One section per configured partition, in configuration order.
    pub sections: Vec<PartitionSection>,
    /// The merged document.
    pub document: String,
}

/// Builds the report from the persisted state.
///
/// # Errors
///
/// Returns [`ReportError`] if a query or the document template fails.
pub fn build_report(
    db: &Database,
    config: &LeaderboardConfig,
    renderer: &DocumentRenderer,
    now: DateTime<Utc>,
) -> Result<Report, ReportError> {
    let mut sections = Vec::with_capacity(config.partitions.len());

    for partition in &config.partitions {
        let issues = db.open_issues_for_partition(&partition.labels)?;
        let rows = render_partition(&issues, &config.labels);
        debug!(
            partition = %partition.name,
            open = issues.len(),
            rows = rows.len(),
            "Rendered partition"
        );
        sections.push(PartitionSection {
            name: partition.name.clone(),
            table: render_table(&rows),
        });
    }

    let document = renderer.render(&ReportDocument {
        project: config.project_name().to_string(),
        partitions: sections.clone(),
        updated_at: format_timestamp(now),
    })?;

    info!(partitions = sections.len(), "Report rendered");
    Ok(Report { sections, document })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Partition;
    use crate::model::fixtures::{at, issue};
    use crate::model::Assignee;
    use std::path::Path;

    fn config(partitions: Vec<Partition>) -> LeaderboardConfig {
        let mut config = LeaderboardConfig::parse(
            "owner = \"pingcap\"\nrepository = \"tidb\"\npartitions = [{ name = \"sig/planner\", labels = [\"sig/planner\"] }]\n",
            Path::new("leaderboard.toml"),
        )
        .unwrap();
        config.partitions = partitions;
        config
    }

    fn labeled(number: u64, labels: &[&str]) -> crate::model::Issue {
        let mut issue = issue(number);
        issue.labels = labels.iter().map(|l| l.to_string()).collect();
        issue
    }

    fn seeded() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        let mut assigned = labeled(3, &["type/bug", "sig/planner", "severity/critical"]);
        assigned.assignees = vec![Assignee {
            login: "dev".to_string(),
            created_at: at(5),
        }];
        let issues = vec![
            labeled(1, &["type/bug", "sig/planner", "severity/major"]),
            labeled(2, &["type/bug", "sig/planner"]),
            assigned,
            labeled(4, &["type/bug", "sig/planner", "severity/minor"]),
            labeled(5, &["type/enhancement", "sig/planner"]),
            labeled(6, &["type/bug", "sig/execution", "severity/moderate"]),
        ];
        for issue in &issues {
            db.persist_issue(issue).unwrap();
        }
        db
    }

    fn row_numbers(table: &str) -> Vec<String> {
        table
            .lines()
            .skip(2)
            .map(|line| {
                let start = line.find("[#").unwrap() + 2;
                let end = start + line[start..].find(']').unwrap();
                line[start..end].to_string()
            })
            .collect()
    }

    #[test]
    fn builds_one_sorted_table_per_partition() {
        let db = seeded();
        let config = config(vec![
            Partition::single("sig/planner"),
            Partition::single("sig/execution"),
        ]);
        let renderer = DocumentRenderer::new(DEFAULT_DOCUMENT_TEMPLATE).unwrap();

        let report = build_report(&db, &config, &renderer, at(9)).unwrap();

        assert_eq!(report.sections.len(), 2);
        assert_eq!(report.sections[0].name, "sig/planner");
        assert_eq!(row_numbers(&report.sections[0].table), vec!["2", "3", "1", "4"]);
        assert_eq!(row_numbers(&report.sections[1].table), vec!["6"]);
        assert!(report.document.contains("updated at 2021-06-09T12:00:00-00:00"));
    }

    #[test]
    fn attention_marker_only_on_untouched_rows() {
        let db = seeded();
        let config = config(vec![Partition::single("sig/planner")]);
        let renderer = DocumentRenderer::new(DEFAULT_DOCUMENT_TEMPLATE).unwrap();

        let report = build_report(&db, &config, &renderer, at(9)).unwrap();
        let table = &report.sections[0].table;

        let assigned = table.lines().find(|line| line.contains("[#3]")).unwrap();
        assert!(!assigned.contains(ATTENTION_MARKER));
        let untouched = table.lines().find(|line| line.contains("[#2]")).unwrap();
        assert!(untouched.contains(&format!("{ATTENTION_MARKER}[#2]")));
    }

    #[test]
    fn closed_issues_are_not_reported() {
        let mut db = seeded();
        let mut closed = labeled(1, &["type/bug", "sig/planner", "severity/major"]);
        closed.state = crate::model::IssueState::Closed;
        closed.closed_at = Some(at(8));
        closed.updated_at = at(8);
        db.persist_issue(&closed).unwrap();

        let config = config(vec![Partition::single("sig/planner")]);
        let renderer = DocumentRenderer::new(DEFAULT_DOCUMENT_TEMPLATE).unwrap();
        let report = build_report(&db, &config, &renderer, at(9)).unwrap();

        assert_eq!(row_numbers(&report.sections[0].table), vec!["2", "3", "4"]);
    }

    #[test]
    fn empty_partition_renders_header_only() {
        let db = seeded();
        let config = config(vec![Partition::single("sig/ddl")]);
        let renderer = DocumentRenderer::new(DEFAULT_DOCUMENT_TEMPLATE).unwrap();

        let report = build_report(&db, &config, &renderer, at(9)).unwrap();

        assert_eq!(report.sections[0].table.lines().count(), 2);
        assert!(report.document.contains("<h2 name=\"sig/ddl\">sig/ddl</h2>"));
    }
}
