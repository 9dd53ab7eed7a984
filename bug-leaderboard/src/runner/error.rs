//! Runner error types.

/// Errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// The database could not be opened or read.
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),

    /// The document template could not be compiled.
    #[error(transparent)]
    Template(#[from] crate::report::TemplateError),

    /// The report could not be built.
    #[error(transparent)]
    Report(#[from] crate::report::ReportError),

    /// The persist and report task panicked.
    #[error("Persist task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
