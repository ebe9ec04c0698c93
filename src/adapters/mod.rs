//! Port implementations: live (real systems), recording (live plus
//! cassette capture) and replaying (cassette playback).

pub mod live;
pub mod recording;
pub mod replaying;
