//! Integration tests for top-level CLI behavior.

use std::process::Command;

use serde_json::json;

use ghtally::cassette::recorder::CassetteRecorder;

fn run_ghtally(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_ghtally");
    Command::new(bin)
        .args(args)
        .env_remove("GHTALLY_RECORD")
        .env_remove("GHTALLY_CACHE_DIR")
        .env_remove("GHTALLY_STRATEGY")
        .output()
        .expect("failed to run ghtally binary")
}

#[test]
fn days_lists_each_day_in_range() {
    let output = run_ghtally(&["days", "2024-01-30", "2024-02-02"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert_eq!(stdout, "2024-01-30\n2024-01-31\n2024-02-01\n2024-02-02\n");
}

#[test]
fn days_rejects_backwards_range() {
    let output = run_ghtally(&["days", "2024-02-02", "2024-01-30"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("is after"));
}

#[test]
fn stats_rejects_blank_username() {
    let output = run_ghtally(&["stats", " ", "--no-cache"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("username must not be blank"));
}

#[test]
fn stats_help_shows_usage() {
    let output = run_ghtally(&["stats", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--from"));
    assert!(stdout.contains("--replay"));
}

#[test]
fn stats_replays_cassette_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("search.cassette.yaml");
    let mut recorder = CassetteRecorder::new(&path, "search");
    recorder.record("clock", "now", json!({}), json!("2024-03-10T12:00:00Z"));
    recorder.record(
        "github",
        "search_commits_by_author",
        json!({
            "author": "alice",
            "since": "2024-03-01T00:00:00Z",
            "until": "2024-03-01T23:59:59Z",
            "page": 1,
        }),
        json!({"Ok": [{
            "repo_full_name": "alice/blog",
            "commit": {
                "sha": "b1",
                "html_url": "https://github.com/alice/blog/commit/b1",
                "message": "Write post",
                "committed_at": "2024-03-01T09:00:00Z",
            },
        }]}),
    );
    recorder.record(
        "github",
        "get_commit_diff_stats",
        json!({"repo": "alice/blog", "sha": "b1"}),
        json!({"Ok": {"additions": 5, "deletions": 1}}),
    );
    recorder.finish().unwrap();

    let output = run_ghtally(&[
        "stats",
        "alice",
        "--from",
        "2024-03-01",
        "--json",
        "--no-cache",
        "--strategy",
        "search",
        "--replay",
        path.to_str().unwrap(),
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stderr}");

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["username"], "alice");
    assert_eq!(summary["totalAdditions"], 5);
    assert_eq!(summary["totalDeletions"], 1);
    assert_eq!(summary["repos"][0]["repoFullName"], "alice/blog");
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = run_ghtally(&["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
