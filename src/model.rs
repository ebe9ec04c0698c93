//! Commit-stat records and the summaries built from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One attributed commit with its diff stats.
///
/// `(repo_full_name, sha)` identifies the diff-stat lookup that produced
/// `additions` and `deletions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Commit hash.
    pub sha: String,
    /// Repository as `owner/name`.
    pub repo_full_name: String,
    /// Web URL of the repository.
    pub repo_url: String,
    /// First line of the commit message.
    pub message: String,
    /// Committer timestamp.
    pub committed_at: DateTime<Utc>,
    /// Web URL of the commit.
    pub commit_url: String,
    /// Lines added.
    pub additions: u64,
    /// Lines removed.
    pub deletions: u64,
}

impl CommitRecord {
    /// Builds a record from a listed commit and its resolved diff stats.
    #[must_use]
    pub fn from_listing(repo_full_name: &str, listing: &CommitListing, stats: DiffStats) -> Self {
        Self {
            sha: listing.sha.clone(),
            repo_full_name: repo_full_name.to_string(),
            repo_url: repo_url_for(repo_full_name, &listing.sha, &listing.html_url),
            message: first_line(&listing.message).to_string(),
            committed_at: listing.committed_at,
            commit_url: listing.html_url.clone(),
            additions: stats.additions,
            deletions: stats.deletions,
        }
    }

    /// UTC calendar day the commit was made on.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.committed_at.date_naive()
    }
}

/// All commits in one repository, with their sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSummary {
    /// Repository as `owner/name`.
    pub repo_full_name: String,
    /// Web URL of the repository (first one seen).
    pub repo_url: String,
    /// Sum of `additions` over `commits`.
    pub additions: u64,
    /// Sum of `deletions` over `commits`.
    pub deletions: u64,
    /// Number of entries in `commits`.
    pub commit_count: u64,
    /// Contributing commits in fetch order.
    pub commits: Vec<CommitRecord>,
}

impl RepoSummary {
    /// Lines touched in this repository.
    #[must_use]
    pub fn churn(&self) -> u64 {
        self.additions + self.deletions
    }
}

/// Result of resolving a user's activity over `[from, to]`.
///
/// `repos` is already ordered by churn, descending; consumers must keep
/// that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSummary {
    /// GitHub login the range was resolved for.
    pub username: String,
    /// First day, inclusive.
    pub from: NaiveDate,
    /// Last day, inclusive.
    pub to: NaiveDate,
    /// Sum of additions over every commit.
    pub total_additions: u64,
    /// Sum of deletions over every commit.
    pub total_deletions: u64,
    /// Number of commits.
    pub total_commits: u64,
    /// Per-repository breakdown.
    pub repos: Vec<RepoSummary>,
}

/// A repository as returned by a repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoListing {
    /// Repository as `owner/name`.
    pub full_name: String,
    /// Last push time, when the listing exposes it.
    pub pushed_at: Option<DateTime<Utc>>,
}

/// A commit as returned by a per-repository commit listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitListing {
    /// Commit hash.
    pub sha: String,
    /// Web URL of the commit.
    pub html_url: String,
    /// Full commit message.
    pub message: String,
    /// Committer timestamp.
    pub committed_at: DateTime<Utc>,
}

/// A commit as returned by the commit search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Repository the commit belongs to.
    pub repo_full_name: String,
    /// The commit itself.
    pub commit: CommitListing,
}

/// Line counts for a single commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Lines added.
    pub additions: u64,
    /// Lines removed.
    pub deletions: u64,
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

fn repo_url_for(repo_full_name: &str, sha: &str, commit_url: &str) -> String {
    commit_url
        .strip_suffix(&format!("/commit/{sha}"))
        .map_or_else(|| format!("https://github.com/{repo_full_name}"), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(sha: &str, html_url: &str, message: &str) -> CommitListing {
        CommitListing {
            sha: sha.into(),
            html_url: html_url.into(),
            message: message.into(),
            committed_at: "2024-03-01T12:30:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn from_listing_keeps_first_message_line_and_derives_repo_url() {
        let l = listing(
            "abc123",
            "https://github.com/alice/blog/commit/abc123",
            "Fix header\n\nLonger body here",
        );
        let record =
            CommitRecord::from_listing("alice/blog", &l, DiffStats { additions: 4, deletions: 1 });

        assert_eq!(record.message, "Fix header");
        assert_eq!(record.repo_url, "https://github.com/alice/blog");
        assert_eq!(record.commit_url, "https://github.com/alice/blog/commit/abc123");
        assert_eq!(record.additions, 4);
        assert_eq!(record.day(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn repo_url_falls_back_when_commit_url_is_unexpected() {
        let l = listing("abc123", "https://example.test/odd", "msg");
        let record = CommitRecord::from_listing("alice/blog", &l, DiffStats::default());
        assert_eq!(record.repo_url, "https://github.com/alice/blog");
    }

    #[test]
    fn empty_message_yields_empty_first_line() {
        let l = listing("abc", "https://github.com/a/b/commit/abc", "");
        let record = CommitRecord::from_listing("a/b", &l, DiffStats::default());
        assert_eq!(record.message, "");
    }

    #[test]
    fn summary_serializes_with_camel_case_fields() {
        let summary = RangeSummary {
            username: "alice".into(),
            from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            total_additions: 1,
            total_deletions: 2,
            total_commits: 1,
            repos: Vec::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalAdditions"], 1);
        assert_eq!(json["from"], "2024-03-01");
        assert!(json.get("total_additions").is_none());
    }
}
