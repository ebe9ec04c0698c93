//! `ghtally stats` command.

use std::fmt;

use crate::cli::StatsArgs;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::dates;
use crate::model::RangeSummary;

/// Execute the `stats` command.
///
/// Resolves the range summary for one user and prints it as a table of
/// repositories (already ordered by churn) or as JSON.
///
/// # Errors
///
/// Returns an error string if settings, dates, or the resolution fail.
pub fn run(args: &StatsArgs) -> Result<(), String> {
    let username = args.username.trim();
    if username.is_empty() {
        return Err("username must not be blank".to_string());
    }

    let settings = settings_for(args)?;
    let ctx = context_for(args, &settings)?;

    let from = match &args.from {
        Some(raw) => dates::parse_day(raw).map_err(|e| e.to_string())?,
        None => ctx.clock.today(),
    };
    let to = match &args.to {
        Some(raw) => dates::parse_day(raw).map_err(|e| e.to_string())?,
        None => from,
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to build tokio runtime: {e}"))?;
    let summary = rt.block_on(ctx.resolve(username, from, to)).map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Failed to serialize summary: {e}"))?;
        println!("{json}");
    } else {
        print!("{}", render_table(&summary));
    }
    Ok(())
}

/// Environment settings with this invocation's flags applied on top.
fn settings_for(args: &StatsArgs) -> Result<Settings, String> {
    let mut settings = Settings::from_env().map_err(|e| e.to_string())?;
    if let Some(strategy) = args.strategy {
        settings.strategy = strategy;
    }
    if let Some(dir) = &args.cache_dir {
        settings.cache_dir = Some(dir.clone());
    }
    if args.no_cache {
        settings.cache_dir = None;
    }
    Ok(settings)
}

fn context_for(args: &StatsArgs, settings: &Settings) -> Result<ServiceContext, String> {
    let ctx = match (&args.replay, &settings.record_path) {
        (Some(cassette), _) => ServiceContext::replaying(settings, cassette),
        (None, Some(cassette)) => ServiceContext::recording(settings, cassette),
        (None, None) => ServiceContext::live(settings),
    };
    ctx.map_err(|e| e.to_string())
}

fn render_table(summary: &RangeSummary) -> String {
    Table(summary).to_string()
}

/// Plain-text table of a [`RangeSummary`].
struct Table<'a>(&'a RangeSummary);

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        if summary.from == summary.to {
            writeln!(f, "{} ({})", summary.username, summary.from)?;
        } else {
            writeln!(f, "{} ({} .. {})", summary.username, summary.from, summary.to)?;
        }

        if summary.repos.is_empty() {
            return writeln!(f, "No commits found.");
        }

        let repo_width =
            summary.repos.iter().map(|r| r.repo_full_name.len()).max().unwrap_or(4).max(4);

        writeln!(
            f,
            "{:<repo_width$}  {:>7}  {:>9}  {:>9}",
            "REPO", "COMMITS", "ADDITIONS", "DELETIONS",
        )?;
        writeln!(f, "{:-<repo_width$}  {:->7}  {:->9}  {:->9}", "", "", "", "")?;

        for repo in &summary.repos {
            let added = format!("+{}", repo.additions);
            let removed = format!("-{}", repo.deletions);
            writeln!(
                f,
                "{:<repo_width$}  {:>7}  {added:>9}  {removed:>9}",
                repo.repo_full_name, repo.commit_count,
            )?;
        }

        writeln!(
            f,
            "\n{} commit(s) across {} repo(s): +{} -{}",
            summary.total_commits,
            summary.repos.len(),
            summary.total_additions,
            summary.total_deletions,
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::RepoSummary;

    fn repo(name: &str, commits: u64, additions: u64, deletions: u64) -> RepoSummary {
        RepoSummary {
            repo_full_name: name.into(),
            repo_url: format!("https://github.com/{name}"),
            additions,
            deletions,
            commit_count: commits,
            commits: Vec::new(),
        }
    }

    fn summary(repos: Vec<RepoSummary>) -> RangeSummary {
        RangeSummary {
            username: "alice".into(),
            from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_additions: repos.iter().map(|r| r.additions).sum(),
            total_deletions: repos.iter().map(|r| r.deletions).sum(),
            total_commits: repos.iter().map(|r| r.commit_count).sum(),
            repos,
        }
    }

    #[test]
    fn table_keeps_repo_order_and_prints_totals() {
        let out = render_table(&summary(vec![
            repo("alice/blog", 3, 8, 4),
            repo("alice/dotfiles", 1, 1, 0),
        ]));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "alice (2024-03-01)");
        assert!(lines[1].starts_with("REPO"));
        assert!(lines[3].starts_with("alice/blog"));
        assert!(lines[3].contains("+8"));
        assert!(lines[4].starts_with("alice/dotfiles"));
        assert!(out.ends_with("4 commit(s) across 2 repo(s): +9 -4\n"));
    }

    #[test]
    fn empty_summary_says_so() {
        let out = render_table(&summary(Vec::new()));
        assert!(out.contains("No commits found."));
    }

    #[test]
    fn table_renders_every_line_for_a_multi_day_range() {
        let mut s = summary(vec![repo("o/x", 2, 10, 3)]);
        s.to = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        let expected = "alice (2024-03-01 .. 2024-03-02)\n\
                        REPO  COMMITS  ADDITIONS  DELETIONS\n\
                        ----  -------  ---------  ---------\n\
                        o/x         2        +10         -3\n\
                        \n\
                        2 commit(s) across 1 repo(s): +10 -3\n";
        assert_eq!(render_table(&s), expected);
    }

    #[test]
    fn blank_username_is_rejected_before_any_io() {
        let args = StatsArgs {
            username: "   ".into(),
            from: None,
            to: None,
            json: false,
            strategy: None,
            cache_dir: None,
            no_cache: true,
            replay: None,
        };
        assert_eq!(run(&args).unwrap_err(), "username must not be blank");
    }
}
