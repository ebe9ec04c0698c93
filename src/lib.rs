//! Core library for the `ghtally` CLI.
//!
//! Resolves how many lines a GitHub user added and removed per repository
//! over a range of UTC days. Finished days are cached per user and day;
//! today is always fetched fresh.

pub mod adapters;
pub mod aggregate;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod model;
pub mod ports;
pub mod resolve;
pub mod store;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
