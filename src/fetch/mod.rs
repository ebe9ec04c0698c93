//! Commit fetcher: discovers a user's commits in a date window and
//! resolves each commit's diff stats.
//!
//! Discovery follows one of two strategies:
//!
//! - [`DiscoveryStrategy::RepoEnumeration`] lists the repositories reachable
//!   for the user, keeps those pushed to since `from`, then lists the user's
//!   commits in each.
//! - [`DiscoveryStrategy::GlobalSearch`] runs a single commit search, which
//!   upstream caps at 1000 results.
//!
//! Repository commit listings and diff-stat lookups run in fixed-width
//! all-settle batches. A failure inside a batch drops that one repository
//! or commit and is logged; failures outside a batch (the first repository
//! page, the search itself) fail the whole call.

pub mod batch;
pub mod memo;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::dates;
use crate::error::{Result, StatsError};
use crate::model::{CommitListing, CommitRecord, DiffStats, RepoListing};
use crate::ports::{CommitSource, PAGE_SIZE};

pub use batch::{settle_in_batches, DEFAULT_CONCURRENCY};
pub use memo::{DiffStatCache, DEFAULT_MEMO_CAPACITY};

/// Most repository pages read during enumeration.
pub const MAX_REPO_PAGES: u32 = 10;

/// Upstream ceiling on commit search results.
pub const SEARCH_RESULT_LIMIT: usize = 1000;

/// How candidate commits are discovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// Enumerate repositories, then list commits per repository.
    #[default]
    RepoEnumeration,
    /// Query the global commit search endpoint.
    GlobalSearch,
}

impl FromStr for DiscoveryStrategy {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "repos" | "repo" | "repo-enumeration" => Ok(Self::RepoEnumeration),
            "search" | "global-search" => Ok(Self::GlobalSearch),
            other => Err(StatsError::Config(format!(
                "Unknown discovery strategy: {other}. Supported: repos, search"
            ))),
        }
    }
}

impl fmt::Display for DiscoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepoEnumeration => f.write_str("repos"),
            Self::GlobalSearch => f.write_str("search"),
        }
    }
}

/// Tuning for a [`CommitFetcher`].
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Discovery strategy.
    pub strategy: DiscoveryStrategy,
    /// Requests in flight per batch.
    pub concurrency: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { strategy: DiscoveryStrategy::default(), concurrency: DEFAULT_CONCURRENCY }
    }
}

/// Fetches a user's commits with diff stats from a [`CommitSource`].
pub struct CommitFetcher<'a> {
    source: &'a dyn CommitSource,
    memo: &'a DiffStatCache,
    options: FetchOptions,
}

impl<'a> CommitFetcher<'a> {
    /// Creates a fetcher reading from `source` and memoizing diff stats in `memo`.
    #[must_use]
    pub fn new(source: &'a dyn CommitSource, memo: &'a DiffStatCache, options: FetchOptions) -> Self {
        Self { source, memo, options }
    }

    /// Strategy this fetcher discovers commits with.
    #[must_use]
    pub fn strategy(&self) -> DiscoveryStrategy {
        self.options.strategy
    }

    /// Returns every commit by `username` committed in `[from 00:00:00Z,
    /// to 23:59:59Z]`, in fetch order.
    ///
    /// Commits whose diff stats cannot be fetched, and repositories whose
    /// commits cannot be listed, are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the repositories cannot be listed at all or the
    /// commit search fails.
    pub async fn fetch_commits(
        &self,
        username: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CommitRecord>> {
        let since = dates::start_of(from);
        let until = dates::end_of(to);
        debug!(username, %from, %to, strategy = %self.options.strategy, "fetching commits");

        let records = match self.options.strategy {
            DiscoveryStrategy::RepoEnumeration => self.fetch_by_repos(username, since, until).await?,
            DiscoveryStrategy::GlobalSearch => self.fetch_by_search(username, since, until).await?,
        };
        debug!(username, commits = records.len(), "fetched commits");
        Ok(records)
    }

    async fn fetch_by_repos(
        &self,
        username: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<CommitRecord>> {
        let repos = self.discover_repositories(username, since).await?;
        debug!(repos = repos.len(), "repositories pushed to within window");

        let settled = settle_in_batches(&repos, self.options.concurrency, |repo| async move {
            let listings =
                self.list_repo_commits(&repo.full_name, username, since, until).await?;
            let items: Vec<(String, CommitListing)> =
                listings.into_iter().map(|c| (repo.full_name.clone(), c)).collect();
            Ok::<_, StatsError>(self.resolve_stats(&items).await)
        })
        .await;

        let mut records = Vec::new();
        for (repo, outcome) in settled {
            match outcome {
                Ok(found) => records.extend(found),
                Err(err) => {
                    warn!(repo = %repo.full_name, error = %err, "dropping repository whose commits could not be listed");
                }
            }
        }
        Ok(records)
    }

    async fn fetch_by_search(
        &self,
        username: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<CommitRecord>> {
        let mut items: Vec<(String, CommitListing)> = Vec::new();
        let mut page = 1;
        while items.len() < SEARCH_RESULT_LIMIT {
            let hits = self.source.search_commits_by_author(username, since, until, page).await?;
            let short = hits.len() < PAGE_SIZE;
            items.extend(hits.into_iter().map(|h| (h.repo_full_name, h.commit)));
            debug!(page, found = items.len(), "search page");
            if short {
                break;
            }
            page += 1;
        }
        items.truncate(SEARCH_RESULT_LIMIT);
        Ok(self.resolve_stats(&items).await)
    }

    /// Lists repositories pushed to at or after `since`.
    ///
    /// With an authenticated source the listing is ordered by push time, so
    /// paging stops once a page ends before `since`. Anonymous listings are
    /// read until a short page or the page cap.
    async fn discover_repositories(
        &self,
        username: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<RepoListing>> {
        let authenticated = self.source.is_authenticated();
        let mut repos = Vec::new();

        for page in 1..=MAX_REPO_PAGES {
            let listed = match self.source.list_repositories(username, page).await {
                Ok(listed) => listed,
                Err(err) if page == 1 => return Err(err),
                Err(err) => {
                    warn!(page, error = %err, "stopping repository listing early");
                    break;
                }
            };
            let short = listed.len() < PAGE_SIZE;
            let reached_older = authenticated
                && listed.last().and_then(|r| r.pushed_at).is_some_and(|pushed| pushed < since);
            repos.extend(listed);
            if short || reached_older {
                break;
            }
        }

        repos.retain(|r| r.pushed_at.map_or(!authenticated, |pushed| pushed >= since));
        Ok(repos)
    }

    async fn list_repo_commits(
        &self,
        repo_full_name: &str,
        author: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<CommitListing>> {
        let mut commits = Vec::new();
        let mut page = 1;
        loop {
            let listed = self
                .source
                .list_commits_by_author(repo_full_name, author, since, until, page)
                .await?;
            let short = listed.len() < PAGE_SIZE;
            commits.extend(listed);
            if short {
                return Ok(commits);
            }
            page += 1;
        }
    }

    /// Pairs each listed commit with its diff stats, dropping the ones whose
    /// lookup fails.
    async fn resolve_stats(&self, items: &[(String, CommitListing)]) -> Vec<CommitRecord> {
        let settled = settle_in_batches(items, self.options.concurrency, |(repo, commit)| async move {
            let stats = self.diff_stats(repo, &commit.sha).await?;
            Ok::<_, StatsError>(CommitRecord::from_listing(repo, commit, stats))
        })
        .await;

        settled
            .into_iter()
            .filter_map(|((repo, commit), outcome)| match outcome {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(repo = %repo, sha = %commit.sha, error = %err, "dropping commit whose diff stats could not be fetched");
                    None
                }
            })
            .collect()
    }

    async fn diff_stats(&self, repo_full_name: &str, sha: &str) -> Result<DiffStats> {
        if let Some(stats) = self.memo.get(repo_full_name, sha) {
            return Ok(stats);
        }
        let stats = self.source.get_commit_diff_stats(repo_full_name, sha).await?;
        self.memo.insert(repo_full_name, sha, stats);
        Ok(stats)
    }
}
