//! Folds commit records into a per-repository summary.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::{CommitRecord, RangeSummary, RepoSummary};

/// Groups `commits` by repository and totals them.
///
/// Repositories are ordered by `additions + deletions`, descending. The sort
/// is stable, so repositories with equal churn keep first-seen order. Within
/// a repository, commits stay in input order. Grand totals are summed over
/// every input record.
#[must_use]
pub fn aggregate(
    username: &str,
    from: NaiveDate,
    to: NaiveDate,
    commits: Vec<CommitRecord>,
) -> RangeSummary {
    let total_additions = commits.iter().map(|c| c.additions).sum();
    let total_deletions = commits.iter().map(|c| c.deletions).sum();
    let total_commits = commits.len() as u64;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut repos: Vec<RepoSummary> = Vec::new();
    for commit in commits {
        let slot = *index.entry(commit.repo_full_name.clone()).or_insert_with(|| {
            repos.push(RepoSummary {
                repo_full_name: commit.repo_full_name.clone(),
                repo_url: commit.repo_url.clone(),
                additions: 0,
                deletions: 0,
                commit_count: 0,
                commits: Vec::new(),
            });
            repos.len() - 1
        });
        let repo = &mut repos[slot];
        repo.additions += commit.additions;
        repo.deletions += commit.deletions;
        repo.commit_count += 1;
        repo.commits.push(commit);
    }

    repos.sort_by_key(|r| Reverse(r.churn()));

    RangeSummary {
        username: username.to_string(),
        from,
        to,
        total_additions,
        total_deletions,
        total_commits,
        repos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn commit(repo: &str, sha: &str, additions: u64, deletions: u64) -> CommitRecord {
        CommitRecord {
            sha: sha.into(),
            repo_full_name: repo.into(),
            repo_url: format!("https://github.com/{repo}"),
            message: format!("commit {sha}"),
            committed_at: "2024-03-01T10:00:00Z".parse().unwrap(),
            commit_url: format!("https://github.com/{repo}/commit/{sha}"),
            additions,
            deletions,
        }
    }

    #[test]
    fn totals_match_folds_over_input_and_groups() {
        let commits = vec![
            commit("alice/blog", "a1", 5, 1),
            commit("alice/cli", "c1", 10, 10),
            commit("alice/blog", "a2", 2, 0),
            commit("alice/blog", "a3", 1, 3),
        ];
        let summary = aggregate("alice", day("2024-03-01"), day("2024-03-01"), commits);

        assert_eq!(summary.total_additions, 18);
        assert_eq!(summary.total_deletions, 14);
        assert_eq!(summary.total_commits, 4);
        for repo in &summary.repos {
            assert_eq!(repo.commit_count, repo.commits.len() as u64);
            assert_eq!(repo.additions, repo.commits.iter().map(|c| c.additions).sum::<u64>());
            assert_eq!(repo.deletions, repo.commits.iter().map(|c| c.deletions).sum::<u64>());
        }
        let shas: Vec<&str> =
            summary.repos[1].commits.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn repos_sorted_by_churn_descending() {
        let commits = vec![
            commit("o/small", "s", 1, 0),
            commit("o/big", "b", 50, 50),
            commit("o/mid", "m", 10, 0),
        ];
        let summary = aggregate("o", day("2024-03-01"), day("2024-03-02"), commits);
        let names: Vec<&str> = summary.repos.iter().map(|r| r.repo_full_name.as_str()).collect();
        assert_eq!(names, vec!["o/big", "o/mid", "o/small"]);
    }

    #[test]
    fn equal_churn_keeps_first_seen_order() {
        let commits = vec![
            commit("o/second-alpha", "x", 3, 3),
            commit("o/first-beta", "y", 6, 0),
            commit("o/third", "z", 0, 6),
        ];
        let summary = aggregate("o", day("2024-03-01"), day("2024-03-01"), commits);
        let names: Vec<&str> = summary.repos.iter().map(|r| r.repo_full_name.as_str()).collect();
        assert_eq!(names, vec!["o/second-alpha", "o/first-beta", "o/third"]);
    }

    #[test]
    fn first_seen_repo_url_wins() {
        let mut later = commit("o/r", "2", 1, 1);
        later.repo_url = "https://github.com/o/renamed".into();
        let summary =
            aggregate("o", day("2024-03-01"), day("2024-03-01"), vec![commit("o/r", "1", 1, 1), later]);
        assert_eq!(summary.repos.len(), 1);
        assert_eq!(summary.repos[0].repo_url, "https://github.com/o/r");
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        let summary = aggregate("nobody", day("2024-03-01"), day("2024-03-03"), Vec::new());
        assert_eq!(summary.total_commits, 0);
        assert_eq!(summary.total_additions, 0);
        assert!(summary.repos.is_empty());
        assert_eq!(summary.username, "nobody");
    }
}
