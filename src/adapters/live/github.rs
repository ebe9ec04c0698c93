//! Live adapter for the `CommitSource` port using the GitHub REST API.

use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::dates;
use crate::error::{Result, StatsError};
use crate::model::{CommitListing, DiffStats, RepoListing, SearchHit};
use crate::ports::commit_source::{CommitSource, SourceFuture, PAGE_SIZE};

/// Default API root.
pub const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Live commit source that calls the GitHub REST API.
pub struct GitHubSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubSource {
    /// Creates a source for `base_url`, authenticating with `token` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ghtally/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StatsError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, ?query, "GET");

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StatsError::Upstream { status: status.as_u16(), message: body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Repository entry in a listing response.
#[derive(Deserialize)]
struct GhRepo {
    full_name: String,
    pushed_at: Option<DateTime<Utc>>,
}

/// Commit entry in a commit listing or search response.
#[derive(Deserialize)]
struct GhCommit {
    sha: String,
    html_url: String,
    commit: GhCommitDetail,
}

#[derive(Deserialize)]
struct GhCommitDetail {
    message: String,
    committer: Option<GhSignature>,
    author: Option<GhSignature>,
}

#[derive(Deserialize)]
struct GhSignature {
    date: DateTime<Utc>,
}

/// Search response envelope.
#[derive(Deserialize)]
struct GhSearch {
    items: Vec<GhSearchItem>,
}

#[derive(Deserialize)]
struct GhSearchItem {
    #[serde(flatten)]
    commit: GhCommit,
    repository: GhRepoRef,
}

#[derive(Deserialize)]
struct GhRepoRef {
    full_name: String,
}

/// Single-commit response; only the stats matter here.
#[derive(Deserialize)]
struct GhCommitStats {
    stats: Option<GhStats>,
}

#[derive(Deserialize)]
struct GhStats {
    additions: u64,
    deletions: u64,
}

/// Committer date wins; the author date only covers commits GitHub
/// returns without a committer.
fn into_listing(c: GhCommit) -> Result<CommitListing> {
    let committed_at = c
        .commit
        .committer
        .or(c.commit.author)
        .map(|s| s.date)
        .ok_or_else(|| StatsError::Decode(format!("commit {} has no date", c.sha)))?;
    Ok(CommitListing { sha: c.sha, html_url: c.html_url, message: c.commit.message, committed_at })
}

fn page_params(page: u32) -> [(&'static str, String); 2] {
    [("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())]
}

impl CommitSource for GitHubSource {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn list_repositories<'a>(
        &'a self,
        username: &'a str,
        page: u32,
    ) -> SourceFuture<'a, Vec<RepoListing>> {
        Box::pin(async move {
            let repos: Vec<GhRepo> = if self.is_authenticated() {
                let mut query = vec![
                    ("visibility", "all".to_string()),
                    ("affiliation", "owner,collaborator,organization_member".to_string()),
                    ("sort", "pushed".to_string()),
                ];
                query.extend(page_params(page));
                self.get_json("/user/repos", &query).await?
            } else {
                let mut query = vec![("type", "owner".to_string()), ("sort", "pushed".to_string())];
                query.extend(page_params(page));
                self.get_json(&format!("/users/{username}/repos"), &query).await?
            };
            Ok(repos
                .into_iter()
                .map(|r| RepoListing { full_name: r.full_name, pushed_at: r.pushed_at })
                .collect())
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
            let mut query = vec![
                ("author", author.to_string()),
                ("since", dates::api_timestamp(since)),
                ("until", dates::api_timestamp(until)),
            ];
            query.extend(page_params(page));
            let commits: Vec<GhCommit> =
                self.get_json(&format!("/repos/{repo_full_name}/commits"), &query).await?;
            commits.into_iter().map(into_listing).collect()
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
            let q = format!(
                "author:{author} committer-date:{}..{}",
                since.date_naive(),
                until.date_naive()
            );
            let mut query = vec![
                ("q", q),
                ("sort", "committer-date".to_string()),
                ("order", "desc".to_string()),
            ];
            query.extend(page_params(page));
            let found: GhSearch = self.get_json("/search/commits", &query).await?;
            found
                .items
                .into_iter()
                .map(|item| {
                    Ok::<_, StatsError>(SearchHit {
                        repo_full_name: item.repository.full_name,
                        commit: into_listing(item.commit)?,
                    })
                })
                .collect()
        })
    }

    fn get_commit_diff_stats<'a>(
        &'a self,
        repo_full_name: &'a str,
        sha: &'a str,
    ) -> SourceFuture<'a, DiffStats> {
        Box::pin(async move {
            let detail: GhCommitStats =
                self.get_json(&format!("/repos/{repo_full_name}/commits/{sha}"), &[]).await?;
            Ok(detail
                .stats
                .map(|s| DiffStats { additions: s.additions, deletions: s.deletions })
                .unwrap_or_default())
        })
    }
}
