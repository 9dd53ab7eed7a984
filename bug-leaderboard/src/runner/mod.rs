//! Orchestrates a leaderboard sync run.
//!
//! Fetch runs concurrently, one task per partition. Persisting and reporting
//! run after every fetch task has joined, on a blocking thread that owns the
//! database connection. Publishing comes last.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::config::LeaderboardConfig;
use crate::fetch::{fetch_all, FetchOptions, GitHubSource, IssueSource};
use crate::model::RepositoryRef;
use crate::publish::{publish_to_issue, resolve_report_issue, write_artifact, ReportIssue};
use crate::report::{build_report, DocumentRenderer, Report};
use crate::store::Database;
use crate::summary::{PartitionOutcome, PersistOutcome, PublishStatus, RunSummary};
use crate::working_set::WorkingSet;
use chrono::Utc;
use octocrab::Octocrab;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Orchestrates a full fetch, persist, report and publish run.
pub struct Runner {
    config: Arc<LeaderboardConfig>,
    octocrab: Octocrab,
    source: Arc<dyn IssueSource>,
    renderer: Arc<DocumentRenderer>,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the config or template can't be loaded, or
    /// the GitHub client can't be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let leaderboard = config.load()?;
        let octocrab = Octocrab::builder()
            .personal_token(config.token().to_string())
            .build()?;
        let source = Arc::new(GitHubSource::new(octocrab.clone()));
        Self::with_source(leaderboard, octocrab, source)
    }

    /// Builds a runner fetching from `source` instead of GitHub GraphQL.
    ///
    /// `octocrab` is still used for report issue resolution and publishing.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the document template can't be loaded.
    pub fn with_source(
        config: LeaderboardConfig,
        octocrab: Octocrab,
        source: Arc<dyn IssueSource>,
    ) -> Result<Self, RunnerError> {
        let renderer = DocumentRenderer::new(&config.document_template()?)?;
        Ok(Self {
            config: Arc::new(config),
            octocrab,
            source,
            renderer: Arc::new(renderer),
        })
    }

    /// Executes the full orchestration flow.
    ///
    /// Partition fetch and issue persist failures are recorded in the
    /// summary; so are publish failures.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the database can't be opened or the report
    /// can't be built.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new();
        let repository = self.config.repository_ref();

        let report_issue = self.report_issue(&repository, &mut summary).await;

        let db = Database::open(&self.config.database)?;
        let since = if self.config.incremental {
            db.sync_watermark().unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read last sync time, fetching everything");
                None
            })
        } else {
            None
        };

        let working_set = Arc::new(WorkingSet::new());
        let options = FetchOptions {
            page_size: self.config.page_size,
            debug: self.config.debug,
            since,
        };
        let outcomes = fetch_all(
            Arc::clone(&self.source),
            Arc::clone(&working_set),
            &repository,
            &self.config.partitions,
            options,
        )
        .await;
        for outcome in &outcomes {
            summary.record_partition(outcome);
        }

        let issues = Arc::into_inner(working_set)
            .map(WorkingSet::into_issues)
            .unwrap_or_else(|| {
                error!("Working set still shared after fetch, nothing to persist");
                Vec::new()
            });
        summary.issues_fetched = issues.len();
        info!(issues = issues.len(), "Fetch complete");

        let fetched_everything = !self.config.debug
            && outcomes
                .iter()
                .all(|outcome| matches!(outcome, PartitionOutcome::Fetched { .. }));

        let config = Arc::clone(&self.config);
        let renderer = Arc::clone(&self.renderer);
        let (persisted, report) = tokio::task::spawn_blocking(
            move || -> Result<(Vec<PersistOutcome>, Report), RunnerError> {
                let mut db = db;
                let persisted = db.persist_all(&issues);
                let persisted_everything = persisted
                    .iter()
                    .all(|outcome| matches!(outcome, PersistOutcome::Persisted { .. }));
                if fetched_everything && persisted_everything {
                    if let Err(e) = db.record_sync() {
                        warn!(error = %e, "Failed to record sync watermark");
                    }
                } else {
                    info!("Run incomplete, sync watermark left unchanged");
                }
                let report = build_report(&db, &config, &renderer, Utc::now())?;
                Ok((persisted, report))
            },
        )
        .await??;

        for outcome in &persisted {
            summary.record_persist(outcome);
        }
        summary.partitions_rendered = report.sections.len();

        summary.artifact = match write_artifact(&self.config.output, &report.document) {
            Ok(()) => PublishStatus::Published {
                location: self.config.output.display().to_string(),
            },
            Err(e) => {
                error!(error = %e, "Failed to write report");
                PublishStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        if let Some(issue) = report_issue {
            summary.remote = match publish_to_issue(
                &self.octocrab,
                &repository,
                &issue,
                &self.config.report.title,
                &report.document,
            )
            .await
            {
                Ok(url) => PublishStatus::Published { location: url },
                Err(e) => {
                    error!(error = %e, "Failed to publish report");
                    PublishStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
        }

        Ok(summary)
    }

    /// Resolves the report issue up front, recording why publishing is skipped otherwise.
    async fn report_issue(
        &self,
        repository: &RepositoryRef,
        summary: &mut RunSummary,
    ) -> Option<ReportIssue> {
        let skip = |reason: &str| PublishStatus::Skipped {
            reason: reason.to_string(),
        };

        if !self.config.publish {
            summary.remote = skip("publishing disabled");
            return None;
        }
        let Some(number) = self.config.report.issue_number else {
            summary.remote = skip("no report issue configured");
            return None;
        };

        match resolve_report_issue(&self.octocrab, repository, number).await {
            Ok(issue) => Some(issue),
            Err(e) => {
                warn!(issue_number = number, error = %e, "Failed to resolve report issue");
                summary.remote = skip(&format!("report issue #{number} not resolved: {e}"));
                None
            }
        }
    }
}
