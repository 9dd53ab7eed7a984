//! Publishing of the rendered report.
//!
//! The report is always written to a local file; it is then optionally
//! posted as the title and body of one well-known issue. Publishing runs
//! after persistence, so a failure here never invalidates stored state.

mod error;

pub use error::PublishError;

use crate::model::RepositoryRef;
use crate::rate_limit::{ensure_rate_limit, Resource};
use octocrab::Octocrab;
use std::path::Path;
use tracing::{info, info_span, warn, Instrument};

/// The issue the report is posted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportIssue {
    pub number: u64,
    pub url: String,
}

/// Writes the report to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`PublishError::IoError`] if the file can't be written.
pub fn write_artifact(path: &Path, content: &str) -> Result<(), PublishError> {
    let io_error = |source| PublishError::IoError {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, content).map_err(io_error)?;

    info!(path = %path.display(), bytes = content.len(), "Report written");
    Ok(())
}

/// Looks up the report issue once, before anything is fetched.
///
/// # Errors
///
/// Returns [`PublishError`] if the issue can't be read.
pub async fn resolve_report_issue(
    octocrab: &Octocrab,
    repository: &RepositoryRef,
    number: u64,
) -> Result<ReportIssue, PublishError> {
    ensure_rate_limit(octocrab, Resource::Core).await?;
    let issue = octocrab
        .issues(&repository.owner, &repository.name)
        .get(number)
        .await?;

    let resolved = ReportIssue {
        number: issue.number,
        url: issue.html_url.to_string(),
    };
    info!(repo = %repository, issue_number = number, url = %resolved.url, "Resolved report issue");
    Ok(resolved)
}

/// Replaces the title and body of the report issue.
///
/// Returns the issue URL.
///
/// # Errors
///
/// Returns [`PublishError::PermissionDenied`] if the token can't edit the
/// issue, or [`PublishError::GitHubError`] for any other API failure.
pub async fn publish_to_issue(
    octocrab: &Octocrab,
    repository: &RepositoryRef,
    issue: &ReportIssue,
    title: &str,
    body: &str,
) -> Result<String, PublishError> {
    let span = info_span!("publish", repo = %repository, issue_number = issue.number);

    async {
        ensure_rate_limit(octocrab, Resource::Core).await?;

        let result = octocrab
            .issues(&repository.owner, &repository.name)
            .update(issue.number)
            .title(title)
            .body(body)
            .send()
            .await;

        match result {
            Ok(updated) => {
                let url = updated.html_url.to_string();
                info!(url = %url, "Report published");
                Ok(url)
            }
            Err(e) if is_permission_denied(&e) => {
                warn!("Permission denied, report not published");
                Err(PublishError::PermissionDenied {
                    repository: repository.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
    .instrument(span)
    .await
}

/// Checks if an API error indicates permission denied.
fn is_permission_denied(error: &octocrab::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("403") || msg.contains("forbidden") || msg.contains("permission")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_artifact_creating_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site").join("index.md");

        write_artifact(&path, "| issue |").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "| issue |");
    }

    #[test]
    fn overwrites_previous_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.md");

        write_artifact(&path, "old").unwrap();
        write_artifact(&path, "new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_into_a_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let result = write_artifact(&blocker.join("index.md"), "x");

        assert!(matches!(result, Err(PublishError::IoError { .. })));
    }
}
