//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::fetch::DiscoveryStrategy;

/// Top-level CLI parser for `ghtally`.
#[derive(Debug, Parser)]
#[command(name = "ghtally", version, about = "Tally a GitHub user's commit churn over a date range")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summarize additions and deletions per repository.
    Stats(StatsArgs),
    /// List the UTC calendar days in a range, one per line.
    Days {
        /// First day, `YYYY-MM-DD`.
        from: String,
        /// Last day, `YYYY-MM-DD`.
        to: String,
    },
}

/// Arguments for `ghtally stats`.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// GitHub login to summarize.
    pub username: String,
    /// First day, `YYYY-MM-DD` (defaults to today, UTC).
    #[arg(long)]
    pub from: Option<String>,
    /// Last day, `YYYY-MM-DD` (defaults to `--from`).
    #[arg(long)]
    pub to: Option<String>,
    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
    /// Discovery strategy: `repos` or `search`.
    #[arg(long)]
    pub strategy: Option<DiscoveryStrategy>,
    /// Day cache directory (overrides `GHTALLY_CACHE_DIR`).
    #[arg(long, conflicts_with = "no_cache")]
    pub cache_dir: Option<PathBuf>,
    /// Disable the day cache for this run.
    #[arg(long)]
    pub no_cache: bool,
    /// Replay upstream responses from a cassette instead of calling GitHub.
    #[arg(long)]
    pub replay: Option<PathBuf>,
}
