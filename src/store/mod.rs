//! Day cache stores: persistence for per-day commit lists.
//!
//! [`FileDayCache`] keeps one JSON document per `(username, date)` under a
//! root directory and does all I/O through the `FileSystem` port:
//!
//! ```text
//! <root>/
//!   └── <username>/
//!         ├── 2024-03-01.json
//!         └── 2024-03-02.json
//! ```
//!
//! [`MemoryDayCache`] keeps the same entries in a map for the lifetime of
//! the process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StatsError;
use crate::model::CommitRecord;
use crate::ports::{DayCacheStore, FileSystem, StoreFuture};

/// On-disk shape of one cached day.
#[derive(Debug, Serialize, Deserialize)]
struct StoredDay {
    username: String,
    date: NaiveDate,
    commits: Vec<CommitRecord>,
}

/// Day cache backed by JSON files.
///
/// Reads and writes run on tokio's blocking pool, so lookups for different
/// days proceed in parallel.
pub struct FileDayCache {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
}

impl FileDayCache {
    /// Creates a store rooted at the given path.
    #[must_use]
    pub fn new(fs: Box<dyn FileSystem>, root: &Path) -> Self {
        Self { fs: Arc::from(fs), root: root.to_path_buf() }
    }

    fn day_path(&self, username: &str, date: NaiveDate) -> PathBuf {
        self.root.join(safe_segment(username)).join(format!("{date}.json"))
    }
}

fn load(fs: &dyn FileSystem, path: &Path) -> Result<Option<Vec<CommitRecord>>, StatsError> {
    if !fs.exists(path) {
        return Ok(None);
    }
    let contents = fs
        .read_to_string(path)
        .map_err(|e| StatsError::Store(format!("Failed to read {}: {e}", path.display())))?;
    let stored: StoredDay = serde_json::from_str(&contents)
        .map_err(|e| StatsError::Store(format!("Failed to parse {}: {e}", path.display())))?;
    Ok(Some(stored.commits))
}

fn save(fs: &dyn FileSystem, path: &Path, json: &str) -> Result<(), StatsError> {
    fs.write(path, json)
        .map_err(|e| StatsError::Store(format!("Failed to write {}: {e}", path.display())))
}

async fn off_thread<T, F>(task: F) -> Result<T, StatsError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StatsError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| StatsError::Store(format!("Day cache task failed: {e}")))?
}

impl DayCacheStore for FileDayCache {
    fn get<'a>(
        &'a self,
        username: &'a str,
        date: NaiveDate,
    ) -> StoreFuture<'a, Option<Vec<CommitRecord>>> {
        let fs = Arc::clone(&self.fs);
        let path = self.day_path(username, date);
        Box::pin(off_thread(move || load(fs.as_ref(), &path)))
    }

    fn put<'a>(
        &'a self,
        username: &'a str,
        date: NaiveDate,
        commits: &'a [CommitRecord],
    ) -> StoreFuture<'a, ()> {
        let fs = Arc::clone(&self.fs);
        let path = self.day_path(username, date);
        let stored =
            StoredDay { username: username.to_string(), date, commits: commits.to_vec() };
        Box::pin(async move {
            let json = serde_json::to_string_pretty(&stored).map_err(|e| {
                StatsError::Store(format!("Failed to serialize {}/{date}: {e}", stored.username))
            })?;
            off_thread(move || save(fs.as_ref(), &path, &json)).await
        })
    }
}

/// Keeps a login usable as a single path segment.
fn safe_segment(username: &str) -> String {
    username
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Day cache held in memory.
#[derive(Default)]
pub struct MemoryDayCache {
    days: Mutex<HashMap<(String, NaiveDate), Vec<CommitRecord>>>,
}

impl MemoryDayCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached days across all users.
    pub fn len(&self) -> usize {
        self.days.lock().expect("day cache lock poisoned").len()
    }

    /// Returns `true` when no day is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an entry exists for the key.
    pub fn contains(&self, username: &str, date: NaiveDate) -> bool {
        self.days.lock().expect("day cache lock poisoned").contains_key(&(username.to_string(), date))
    }
}

impl DayCacheStore for MemoryDayCache {
    fn get<'a>(
        &'a self,
        username: &'a str,
        date: NaiveDate,
    ) -> StoreFuture<'a, Option<Vec<CommitRecord>>> {
        let found = self
            .days
            .lock()
            .expect("day cache lock poisoned")
            .get(&(username.to_string(), date))
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn put<'a>(
        &'a self,
        username: &'a str,
        date: NaiveDate,
        commits: &'a [CommitRecord],
    ) -> StoreFuture<'a, ()> {
        self.days
            .lock()
            .expect("day cache lock poisoned")
            .insert((username.to_string(), date), commits.to_vec());
        Box::pin(async { Ok(()) })
    }
}
