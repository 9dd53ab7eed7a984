//! CLI for the bug leaderboard.
//!
//! Syncs a repository's bug issues into SQLite, renders the open-bug
//! leaderboard and optionally posts it to the report issue.

use bug_leaderboard::{PublishStatus, RunSummary, Runner, RunnerConfig, RunnerError};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Bug Leaderboard - Mirror bug issues and publish a leaderboard of open bugs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the leaderboard config file.
    #[arg(long, default_value = "leaderboard.toml")]
    config: PathBuf,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN")]
    token: String,

    /// SQLite database path, overriding the config file.
    #[arg(long, env = "LEADERBOARD_DATABASE")]
    database: Option<PathBuf>,

    /// Fetch only the first page of every partition.
    #[arg(long)]
    debug: bool,

    /// Never update the remote report issue.
    #[arg(long)]
    no_publish: bool,

    /// Report output path, overriding the config file.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::new(args.config, args.token)
        .with_database(args.database)
        .with_output(args.output)
        .with_debug(args.debug)
        .with_no_publish(args.no_publish);
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Partitions fetched: {}", summary.partitions_fetched);
    for (partition, error) in &summary.partition_failures {
        println!("    failed {partition}: {error}");
    }
    println!("  Issues fetched: {}", summary.issues_fetched);
    println!("  Issues persisted: {}", summary.issues_persisted);
    for (identity, error) in &summary.persist_failures {
        println!("    failed {identity}: {error}");
    }
    println!("  Partitions rendered: {}", summary.partitions_rendered);
    println!("  Report file: {}", describe(&summary.artifact));
    println!("  Report issue: {}", describe(&summary.remote));
}

fn describe(status: &PublishStatus) -> String {
    match status {
        PublishStatus::Published { location } => format!("published to {location}"),
        PublishStatus::Skipped { reason } => format!("skipped ({reason})"),
        PublishStatus::Failed { error } => format!("failed ({error})"),
        PublishStatus::Pending => status.as_str().to_string(),
    }
}
