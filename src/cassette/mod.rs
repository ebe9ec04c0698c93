//! Cassette format for recording and replaying upstream interactions.

pub mod format;
pub mod recorder;
pub mod replayer;

pub use format::{Cassette, Interaction};
pub use recorder::CassetteRecorder;
pub use replayer::CassetteReplayer;
