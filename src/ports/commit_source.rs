//! Remote commit source port: repository listing, commit listing, commit
//! search and per-commit diff stats.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::error::StatsError;
use crate::model::{CommitListing, DiffStats, RepoListing, SearchHit};

/// Page size requested from every paged endpoint. A page with fewer
/// entries than this is the last one.
pub const PAGE_SIZE: usize = 100;

/// Boxed future type alias used by [`CommitSource`] to keep the trait dyn-compatible.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StatsError>> + Send + 'a>>;

/// Reads commit activity from a paginated remote API.
///
/// Pages are 1-based. Every method fails with [`StatsError::Upstream`] on a
/// non-success response; callers decide whether that failure is fatal.
pub trait CommitSource: Send + Sync {
    /// Whether requests carry credentials. Repository listings for an
    /// anonymous actor only cover the user's public repositories and may not
    /// be ordered reliably by push time.
    fn is_authenticated(&self) -> bool;

    /// Lists one page of repositories reachable for `username`, most
    /// recently pushed first.
    fn list_repositories<'a>(&'a self, username: &'a str, page: u32)
        -> SourceFuture<'a, Vec<RepoListing>>;

    /// Lists one page of commits in `repo_full_name` authored by `author`
    /// with a committer date in `[since, until]`.
    fn list_commits_by_author<'a>(
        &'a self,
        repo_full_name: &'a str,
        author: &'a str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        page: u32,
    ) -> SourceFuture<'a, Vec<CommitListing>>;

    /// Searches one page of commits authored by `author` with a committer
    /// date in `[since, until]`, across all repositories.
    fn search_commits_by_author<'a>(
        &'a self,
        author: &'a str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        page: u32,
    ) -> SourceFuture<'a, Vec<SearchHit>>;

    /// Fetches added/removed line counts for a single commit.
    fn get_commit_diff_stats<'a>(
        &'a self,
        repo_full_name: &'a str,
        sha: &'a str,
    ) -> SourceFuture<'a, DiffStats>;
}
