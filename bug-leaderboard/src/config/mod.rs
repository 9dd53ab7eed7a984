//! Leaderboard configuration.
//!
//! The configuration is a single TOML file naming the tracked repository,
//! the label partitions and the output settings:
//!
//! ```toml
//! owner = "pingcap"
//! repository = "tidb"
//! page-size = 100
//!
//! [report]
//! issue-number = 20804
//!
//! [[partitions]]
//! name = "sig/planner"
//! labels = ["sig/planner"]
//! ```

mod error;
mod labels;
mod partition;

pub use error::ConfigError;
pub use labels::LabelVocabulary;
pub use partition::Partition;

use crate::model::RepositoryRef;
use crate::report::DEFAULT_DOCUMENT_TEMPLATE;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Largest page the tracker's GraphQL API serves.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Settings for the published report.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReportSettings {
    /// Title set on the remote report issue.
    pub title: String,

    /// Number of the issue the report is posted to. Publishing is skipped without it.
    pub issue_number: Option<u64>,

    /// Display name used by the built-in template. Defaults to the repository name.
    pub project: Option<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "Welcome to contribute".to_string(),
            issue_number: None,
            project: None,
        }
    }
}

/// Complete configuration of a leaderboard run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LeaderboardConfig {
    /// Owner of the tracked repository.
    pub owner: String,

    /// Name of the tracked repository.
    pub repository: String,

    /// Issues requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Stop after the first page of every partition.
    #[serde(default)]
    pub debug: bool,

    /// Post the rendered report to the remote report issue.
    #[serde(default = "default_publish")]
    pub publish: bool,

    /// Only fetch issues updated since the newest stored issue.
    #[serde(default)]
    pub incremental: bool,

    /// SQLite database path.
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Path the rendered report is written to.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Optional Handlebars template replacing the built-in report document.
    #[serde(default)]
    pub template: Option<PathBuf>,

    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub labels: LabelVocabulary,

    pub partitions: Vec<Partition>,
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_publish() -> bool {
    true
}

fn default_database() -> PathBuf {
    PathBuf::from("leaderboard.db")
}

fn default_output() -> PathBuf {
    PathBuf::from("index.md")
}

impl LeaderboardConfig {
    /// Loads and validates a configuration file.
    ///
    /// A relative `template` path is resolved against the config file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, malformed or invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading configuration");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let mut config = Self::parse(&content, path)?;
        if let (Some(template), Some(base)) = (config.template.as_mut(), path.parent()) {
            if template.is_relative() {
                *template = base.join(&*template);
            }
        }

        debug!(
            partitions = config.partitions.len(),
            page_size = config.page_size,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Parses and validates configuration content. `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the content is malformed or invalid.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Returns the tracked repository.
    #[must_use]
    pub fn repository_ref(&self) -> RepositoryRef {
        RepositoryRef::new(&self.owner, &self.repository)
    }

    /// Returns the project display name used in the report.
    #[must_use]
    pub fn project_name(&self) -> &str {
        self.report.project.as_deref().unwrap_or(&self.repository)
    }

    /// Returns the report document template: the configured file or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the configured template can't be read.
    pub fn document_template(&self) -> Result<String, ConfigError> {
        match &self.template {
            Some(path) => std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
                path: path.display().to_string(),
                source: e,
            }),
            None => Ok(DEFAULT_DOCUMENT_TEMPLATE.to_string()),
        }
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::ValidationError {
            path: path.display().to_string(),
            message,
        };

        if self.owner.trim().is_empty() {
            return Err(invalid("owner must not be empty".to_string()));
        }

        if self.repository.trim().is_empty() {
            return Err(invalid("repository must not be empty".to_string()));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(invalid(format!(
                "page-size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        if self.partitions.is_empty() {
            return Err(invalid("at least one partition is required".to_string()));
        }

        let mut names = HashSet::new();
        for partition in &self.partitions {
            if partition.name.trim().is_empty() {
                return Err(invalid("partition name must not be empty".to_string()));
            }
            if !names.insert(partition.name.as_str()) {
                return Err(invalid(format!(
                    "duplicate partition name '{}'",
                    partition.name
                )));
            }
            if partition.labels.iter().all(|label| label.trim().is_empty()) {
                return Err(invalid(format!(
                    "partition '{}' must list at least one label",
                    partition.name
                )));
            }
        }

        Ok(())
    }
}
