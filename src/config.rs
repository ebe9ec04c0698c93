//! Runtime settings read from the environment.

use std::path::PathBuf;

use crate::adapters::live::github::GITHUB_API_URL;
use crate::error::{Result, StatsError};
use crate::fetch::{DiscoveryStrategy, DEFAULT_CONCURRENCY, DEFAULT_MEMO_CAPACITY};

/// Environment variable holding the GitHub token.
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";
/// Environment variable overriding the API base URL.
pub const API_URL_VAR: &str = "GHTALLY_API_URL";
/// Environment variable naming the day cache directory.
pub const CACHE_DIR_VAR: &str = "GHTALLY_CACHE_DIR";
/// Environment variable selecting the discovery strategy.
pub const STRATEGY_VAR: &str = "GHTALLY_STRATEGY";
/// Environment variable setting the batch width.
pub const CONCURRENCY_VAR: &str = "GHTALLY_CONCURRENCY";
/// Environment variable setting the diff-stat memo capacity.
pub const MEMO_CAPACITY_VAR: &str = "GHTALLY_MEMO_CAPACITY";
/// Environment variable naming a cassette to record to.
pub const RECORD_VAR: &str = "GHTALLY_RECORD";

/// Everything a run needs to wire its ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Bearer token; `None` runs anonymously.
    pub github_token: Option<String>,
    /// API base URL.
    pub api_url: String,
    /// Root of the file day cache; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// How commits are discovered.
    pub strategy: DiscoveryStrategy,
    /// Requests in flight per batch.
    pub concurrency: usize,
    /// Diff-stat memo capacity.
    pub memo_capacity: usize,
    /// Cassette path to record upstream interactions to.
    pub record_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_token: None,
            api_url: GITHUB_API_URL.to_string(),
            cache_dir: None,
            strategy: DiscoveryStrategy::default(),
            concurrency: DEFAULT_CONCURRENCY,
            memo_capacity: DEFAULT_MEMO_CAPACITY,
            record_path: None,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Ok(Self {
            github_token: get(TOKEN_VAR),
            api_url: get(API_URL_VAR).unwrap_or(defaults.api_url),
            cache_dir: get(CACHE_DIR_VAR).map(PathBuf::from),
            strategy: get(STRATEGY_VAR)
                .map(|v| v.parse::<DiscoveryStrategy>())
                .transpose()?
                .unwrap_or(defaults.strategy),
            concurrency: get(CONCURRENCY_VAR)
                .map(|v| parse_positive(CONCURRENCY_VAR, &v))
                .transpose()?
                .unwrap_or(defaults.concurrency),
            memo_capacity: get(MEMO_CAPACITY_VAR)
                .map(|v| parse_positive(MEMO_CAPACITY_VAR, &v))
                .transpose()?
                .unwrap_or(defaults.memo_capacity),
            record_path: get(RECORD_VAR).map(PathBuf::from),
        })
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(StatsError::Config(format!("{key} must be a positive integer, got {value:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(settings(&[]).unwrap(), Settings::default());
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            (TOKEN_VAR, "ghp_abc"),
            (API_URL_VAR, "http://localhost:9000"),
            (CACHE_DIR_VAR, "/var/cache/ghtally"),
            (STRATEGY_VAR, "search"),
            (CONCURRENCY_VAR, "5"),
            (MEMO_CAPACITY_VAR, "100"),
            (RECORD_VAR, "run.cassette.yaml"),
        ])
        .unwrap();

        assert_eq!(s.github_token.as_deref(), Some("ghp_abc"));
        assert_eq!(s.api_url, "http://localhost:9000");
        assert_eq!(s.cache_dir, Some(PathBuf::from("/var/cache/ghtally")));
        assert_eq!(s.strategy, DiscoveryStrategy::GlobalSearch);
        assert_eq!(s.concurrency, 5);
        assert_eq!(s.memo_capacity, 100);
        assert_eq!(s.record_path, Some(PathBuf::from("run.cassette.yaml")));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let s = settings(&[(TOKEN_VAR, "  "), (CACHE_DIR_VAR, "")]).unwrap();
        assert_eq!(s.github_token, None);
        assert_eq!(s.cache_dir, None);
    }

    #[test]
    fn rejects_bad_numbers_and_strategies() {
        assert!(matches!(settings(&[(CONCURRENCY_VAR, "0")]), Err(StatsError::Config(_))));
        assert!(matches!(settings(&[(MEMO_CAPACITY_VAR, "lots")]), Err(StatsError::Config(_))));
        assert!(matches!(settings(&[(STRATEGY_VAR, "graphql")]), Err(StatsError::Config(_))));
    }
}
