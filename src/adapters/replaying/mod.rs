//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod commit_source;

pub use clock::ReplayingClock;
pub use commit_source::ReplayingCommitSource;

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::StatsError;

/// Look up the recorded output for a call.
///
/// Mirror of `recording::record_interaction`.
pub(crate) fn next_output<I: Serialize>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
    input: &I,
) -> Result<serde_json::Value, StatsError> {
    let input = serde_json::to_value(input)
        .map_err(|e| StatsError::Replay(format!("{port}::{method}: bad input: {e}")))?;
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer
        .next_interaction(port, method, &input)
        .map(|interaction| interaction.output.clone())
        .map_err(StatsError::Replay)
}

/// Replay a recorded `Result<T, StatsError>`.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T, I>(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
    input: &I,
) -> Result<T, StatsError>
where
    T: DeserializeOwned,
    I: Serialize,
{
    let output = next_output(replayer, port, method, input)?;
    serde_json::from_value::<Result<T, StatsError>>(output)
        .map_err(|e| StatsError::Replay(format!("{port}::{method}: bad recorded output: {e}")))?
}
