//! Recording adapter for the `CommitSource` port.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{record_interaction, record_result};
use crate::cassette::recorder::CassetteRecorder;
use crate::model::{CommitListing, DiffStats, RepoListing, SearchHit};
use crate::ports::commit_source::{CommitSource, SourceFuture};

/// Port name used for every commit source interaction.
pub(crate) const PORT: &str = "github";

/// Records commit source interactions while delegating to an inner implementation.
pub struct RecordingCommitSource {
    inner: Box<dyn CommitSource>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingCommitSource {
    /// Creates a new recording source wrapping the given implementation.
    pub fn new(inner: Box<dyn CommitSource>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
pub(crate) struct NoInput {}

#[derive(Serialize)]
pub(crate) struct RepositoriesInput<'a> {
    pub username: &'a str,
    pub page: u32,
}

#[derive(Serialize)]
pub(crate) struct CommitsInput<'a> {
    pub repo: &'a str,
    pub author: &'a str,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub page: u32,
}

#[derive(Serialize)]
pub(crate) struct SearchInput<'a> {
    pub author: &'a str,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub page: u32,
}

#[derive(Serialize)]
pub(crate) struct DiffStatsInput<'a> {
    pub repo: &'a str,
    pub sha: &'a str,
}

impl CommitSource for RecordingCommitSource {
    fn is_authenticated(&self) -> bool {
        let result = self.inner.is_authenticated();
        record_interaction(&self.recorder, PORT, "is_authenticated", &NoInput {}, &result);
        result
    }

    fn list_repositories<'a>(
        &'a self,
        username: &'a str,
        page: u32,
    ) -> SourceFuture<'a, Vec<RepoListing>> {
        Box::pin(async move {
            let result = self.inner.list_repositories(username, page).await;
            let input = RepositoriesInput { username, page };
            record_result(&self.recorder, PORT, "list_repositories", &input, &result);
            result
        })
    }

    fn list_commits_by_author<'a>(
        &'a self,
        repo_full_name: &'a str,
        author: &'a str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        page: u32,
    ) -> SourceFuture<'a, Vec<CommitListing>> {
        Box::pin(async move {
            let result =
                self.inner.list_commits_by_author(repo_full_name, author, since, until, page).await;
            let input = CommitsInput { repo: repo_full_name, author, since, until, page };
            record_result(&self.recorder, PORT, "list_commits_by_author", &input, &result);
            result
        })
    }

    fn search_commits_by_author<'a>(
        &'a self,
        author: &'a str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        page: u32,
    ) -> SourceFuture<'a, Vec<SearchHit>> {
        Box::pin(async move {
            let result = self.inner.search_commits_by_author(author, since, until, page).await;
            let input = SearchInput { author, since, until, page };
            record_result(&self.recorder, PORT, "search_commits_by_author", &input, &result);
            result
        })
    }

    fn get_commit_diff_stats<'a>(
        &'a self,
        repo_full_name: &'a str,
        sha: &'a str,
    ) -> SourceFuture<'a, DiffStats> {
        Box::pin(async move {
            let result = self.inner.get_commit_diff_stats(repo_full_name, sha).await;
            let input = DiffStatsInput { repo: repo_full_name, sha };
            record_result(&self.recorder, PORT, "get_commit_diff_stats", &input, &result);
            result
        })
    }
}
