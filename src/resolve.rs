//! Day-cache resolver: serves finished days from a [`DayCacheStore`] and
//! fetches only what is missing.
//!
//! A range is split into UTC calendar days relative to the clock's today:
//!
//! - past days are looked up in the store; a hit needs no upstream call,
//! - past misses and today are fetched together in one spanning window,
//! - past misses are written back (empty days included), today never is,
//! - days after today cannot hold commits and are skipped.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::dates;
use crate::error::Result;
use crate::fetch::CommitFetcher;
use crate::model::{CommitRecord, RangeSummary};
use crate::ports::{Clock, DayCacheStore};

/// Resolves range summaries, reusing cached past days when a store is set.
pub struct DayCacheResolver<'a> {
    fetcher: &'a CommitFetcher<'a>,
    store: Option<&'a dyn DayCacheStore>,
    clock: &'a dyn Clock,
}

impl<'a> DayCacheResolver<'a> {
    /// Creates a resolver. Without a store every call goes straight to the fetcher.
    #[must_use]
    pub fn new(
        fetcher: &'a CommitFetcher<'a>,
        store: Option<&'a dyn DayCacheStore>,
        clock: &'a dyn Clock,
    ) -> Self {
        Self { fetcher, store, clock }
    }

    /// Summarizes the commits `username` made in `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range runs backwards, the store fails, or the
    /// fetcher fails as a whole.
    pub async fn resolve(&self, username: &str, from: NaiveDate, to: NaiveDate) -> Result<RangeSummary> {
        dates::check_range(from, to)?;

        let commits = match self.store {
            Some(store) => self.resolve_cached(store, username, from, to).await?,
            None => {
                debug!(username, %from, %to, "no day cache configured, fetching whole range");
                self.fetcher.fetch_commits(username, from, to).await?
            }
        };

        let summary = aggregate(username, from, to, commits);
        info!(
            username,
            %from,
            %to,
            commits = summary.total_commits,
            additions = summary.total_additions,
            deletions = summary.total_deletions,
            "resolved range"
        );
        Ok(summary)
    }

    async fn resolve_cached(
        &self,
        store: &dyn DayCacheStore,
        username: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CommitRecord>> {
        let today = self.clock.today();
        let days = dates::each_day(from, to);
        let past_days: Vec<NaiveDate> = days.iter().copied().filter(|d| *d < today).collect();
        let includes_today = days.contains(&today);

        let lookups = join_all(past_days.iter().map(|day| store.get(username, *day))).await;

        let mut merged = Vec::new();
        let mut uncached_past = Vec::new();
        for (day, lookup) in past_days.iter().zip(lookups) {
            match lookup? {
                Some(commits) => merged.extend(commits),
                None => uncached_past.push(*day),
            }
        }

        let mut uncached: BTreeSet<NaiveDate> = uncached_past.iter().copied().collect();
        if includes_today {
            uncached.insert(today);
        }
        info!(
            username,
            hits = past_days.len() - uncached_past.len(),
            misses = uncached_past.len(),
            includes_today,
            "day cache lookup"
        );

        let (Some(&first), Some(&last)) = (uncached.first(), uncached.last()) else {
            return Ok(merged);
        };

        let fresh = self.fetcher.fetch_commits(username, first, last).await?;
        let mut by_day: BTreeMap<NaiveDate, Vec<CommitRecord>> = BTreeMap::new();
        for record in &fresh {
            by_day.entry(record.day()).or_default().push(record.clone());
        }

        let writes = uncached_past.iter().map(|day| {
            let commits = by_day.get(day).map_or(&[][..], Vec::as_slice);
            store.put(username, *day, commits)
        });
        for written in join_all(writes).await {
            written?;
        }
        debug!(username, days = uncached_past.len(), "persisted fetched days");

        // Fresh records keep fetch order; day buckets only feed the store.
        merged.extend(fresh.into_iter().filter(|r| uncached.contains(&r.day())));
        Ok(merged)
    }
}
