//! Replaying adapter for the `CommitSource` port.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::{next_output, replay_result};
use crate::adapters::recording::commit_source::{
    CommitsInput, DiffStatsInput, NoInput, RepositoriesInput, SearchInput, PORT,
};
use crate::cassette::replayer::CassetteReplayer;
use crate::model::{CommitListing, DiffStats, RepoListing, SearchHit};
use crate::ports::commit_source::{CommitSource, SourceFuture};

/// Replays recorded GitHub responses from a cassette.
pub struct ReplayingCommitSource {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingCommitSource {
    /// Creates a new replaying source from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl CommitSource for ReplayingCommitSource {
    /// Falls back to anonymous when the recording never asked.
    fn is_authenticated(&self) -> bool {
        next_output(&self.replayer, PORT, "is_authenticated", &NoInput {})
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn list_repositories<'a>(
        &'a self,
        username: &'a str,
        page: u32,
    ) -> SourceFuture<'a, Vec<RepoListing>> {
        let input = RepositoriesInput { username, page };
        let result = replay_result(&self.replayer, PORT, "list_repositories", &input);
        Box::pin(async move { result })
    }

    fn list_commits_by_author<'a>(
        &'a self,
        repo_full_name: &'a str,
        author: &'a str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        page: u32,
    ) -> SourceFuture<'a, Vec<CommitListing>> {
        let input = CommitsInput { repo: repo_full_name, author, since, until, page };
        let result = replay_result(&self.replayer, PORT, "list_commits_by_author", &input);
        Box::pin(async move { result })
    }

    fn search_commits_by_author<'a>(
        &'a self,
        author: &'a str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        page: u32,
    ) -> SourceFuture<'a, Vec<SearchHit>> {
        let input = SearchInput { author, since, until, page };
        let result = replay_result(&self.replayer, PORT, "search_commits_by_author", &input);
        Box::pin(async move { result })
    }

    fn get_commit_diff_stats<'a>(
        &'a self,
        repo_full_name: &'a str,
        sha: &'a str,
    ) -> SourceFuture<'a, DiffStats> {
        let input = DiffStatsInput { repo: repo_full_name, sha };
        let result = replay_result(&self.replayer, PORT, "get_commit_diff_stats", &input);
        Box::pin(async move { result })
    }
}
