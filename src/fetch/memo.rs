//! Bounded memo of per-commit diff stats.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::model::DiffStats;

/// Default number of `(repo, sha)` entries kept.
pub const DEFAULT_MEMO_CAPACITY: usize = 50_000;

/// Process-wide memo of diff stats keyed by `(repo_full_name, sha)`.
///
/// Diff stats never change once a commit exists, so entries are only
/// evicted to honour the capacity, least recently used first.
pub struct DiffStatCache {
    entries: Mutex<LruCache<(String, String), DiffStats>>,
}

impl DiffStatCache {
    /// Creates a memo holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { entries: Mutex::new(LruCache::new(capacity)) }
    }

    /// Returns the memoized stats for a commit, if any.
    pub fn get(&self, repo_full_name: &str, sha: &str) -> Option<DiffStats> {
        let mut entries = self.entries.lock().expect("diff stat memo lock poisoned");
        entries.get(&(repo_full_name.to_string(), sha.to_string())).copied()
    }

    /// Remembers the stats for a commit.
    pub fn insert(&self, repo_full_name: &str, sha: &str, stats: DiffStats) {
        let mut entries = self.entries.lock().expect("diff stat memo lock poisoned");
        entries.put((repo_full_name.to_string(), sha.to_string()), stats);
    }

    /// Number of memoized commits.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("diff stat memo lock poisoned").len()
    }

    /// Returns `true` when nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DiffStatCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMO_CAPACITY)
    }
}
