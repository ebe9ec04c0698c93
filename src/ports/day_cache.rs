//! Day cache port: persisted commit lists per `(username, day)`.

use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;

use crate::error::StatsError;
use crate::model::CommitRecord;

/// Boxed future type alias used by [`DayCacheStore`] to keep the trait dyn-compatible.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StatsError>> + Send + 'a>>;

/// Persists the commits a user made on a single UTC day.
///
/// There is at most one entry per `(username, date)`; `put` replaces it
/// wholesale.
pub trait DayCacheStore: Send + Sync {
    /// Returns the stored commits for the key, or `None` on a miss.
    ///
    /// An entry holding an empty list is a hit: the day is known to have no
    /// commits.
    fn get<'a>(&'a self, username: &'a str, date: NaiveDate)
        -> StoreFuture<'a, Option<Vec<CommitRecord>>>;

    /// Stores `commits` for the key, overwriting any previous entry.
    fn put<'a>(
        &'a self,
        username: &'a str,
        date: NaiveDate,
        commits: &'a [CommitRecord],
    ) -> StoreFuture<'a, ()>;
}
