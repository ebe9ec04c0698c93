//! Recording adapters that capture interactions to cassettes.

pub mod clock;
pub mod commit_source;

pub use clock::RecordingClock;
pub use commit_source::RecordingCommitSource;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::error::StatsError;

/// Record an interaction with a simple (non-Result) return value.
///
/// Mirror of `replaying::next_output`.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = serde_json::to_value(output).expect("failed to serialize recording output");

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}

/// Record a `Result<T, StatsError>` interaction.
///
/// Mirror of `replaying::replay_result`. `Ok(v)` is stored as `{"Ok": v}`
/// and `Err(e)` as `{"Err": e}` with the error variant intact.
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, StatsError>,
) where
    T: Serialize,
    I: Serialize,
{
    record_interaction(recorder, port, method, input, result);
}
