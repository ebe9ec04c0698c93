//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the resolution core and an
//! external system (time, the GitHub API, the day cache, the filesystem).
//! Implementations live in `src/adapters/` and `src/store/`.

pub mod clock;
pub mod commit_source;
pub mod day_cache;
pub mod filesystem;

pub use clock::Clock;
pub use commit_source::{CommitSource, SourceFuture, PAGE_SIZE};
pub use day_cache::{DayCacheStore, StoreFuture};
pub use filesystem::FileSystem;
