//! Runner configuration.

use crate::config::{ConfigError, LeaderboardConfig};
use std::path::PathBuf;

/// Configuration for running the leaderboard sync.
///
/// Holds the config file location, the token, and the command line
/// overrides applied on top of the file.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the leaderboard config file.
    config_path: PathBuf,
    /// GitHub token used for API calls.
    token: String,
    /// Overrides the configured database path.
    database: Option<PathBuf>,
    /// Overrides the configured artifact path.
    output: Option<PathBuf>,
    /// Forces single-page fetching.
    debug: bool,
    /// Disables the remote publish step.
    no_publish: bool,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(config_path: PathBuf, token: String) -> Self {
        Self {
            config_path,
            token,
            database: None,
            output: None,
            debug: false,
            no_publish: false,
        }
    }

    /// Sets a database path overriding the config file.
    pub fn with_database(mut self, database: Option<PathBuf>) -> Self {
        self.database = database;
        self
    }

    /// Sets an artifact path overriding the config file.
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// Forces debug mode on when `debug` is set.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Disables remote publishing when `no_publish` is set.
    pub fn with_no_publish(mut self, no_publish: bool) -> Self {
        self.no_publish = no_publish;
        self
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Loads the config file and applies the overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be loaded.
    pub fn load(&self) -> Result<LeaderboardConfig, ConfigError> {
        let mut config = LeaderboardConfig::load(&self.config_path)?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut LeaderboardConfig) {
        if let Some(database) = &self.database {
            config.database.clone_from(database);
        }
        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }
        config.debug |= self.debug;
        config.publish &= !self.no_publish;
    }
}
