//! Command dispatch and handlers.

pub mod days;
pub mod stats;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Stats(args) => stats::run(args),
        Command::Days { from, to } => days::run(from, to),
    }
}
