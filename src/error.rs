//! Error taxonomy for commit-stat resolution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Failures that abort a whole resolution call.
///
/// Per-item failures inside a batched lookup never become a `StatsError`
/// seen by the caller; the fetcher logs and drops them.
///
/// Errors serialize losslessly so recorded failures replay as the same
/// variant.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsError {
    /// The remote commit source answered with a non-success status.
    #[error("GitHub API error {status}: {message}")]
    Upstream {
        /// HTTP status code returned upstream.
        status: u16,
        /// Response body or a short description.
        message: String,
    },
    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("GitHub request failed: {0}")]
    Transport(String),
    /// The response body could not be decoded.
    #[error("Failed to decode GitHub response: {0}")]
    Decode(String),
    /// The day cache store is configured but failed.
    #[error("Day cache error: {0}")]
    Store(String),
    /// A date string was not `YYYY-MM-DD`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    /// The requested range runs backwards.
    #[error("Invalid range: from ({from}) is after to ({to})")]
    InvalidRange {
        /// Requested start day.
        from: String,
        /// Requested end day.
        to: String,
    },
    /// An environment or CLI setting has an unusable value.
    #[error("Configuration error: {0}")]
    Config(String),
    /// A replayed cassette has no answer for a request.
    #[error("Cassette replay error: {0}")]
    Replay(String),
}

impl StatsError {
    /// HTTP status for upstream failures, `None` for everything else.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_includes_status_and_body() {
        let err = StatsError::Upstream { status: 403, message: "rate limited".into() };
        assert_eq!(err.to_string(), "GitHub API error 403: rate limited");
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn non_upstream_errors_have_no_status() {
        assert_eq!(StatsError::Store("down".into()).status(), None);
        let err = StatsError::InvalidRange { from: "2024-02-02".into(), to: "2024-02-01".into() };
        assert!(err.to_string().contains("is after"));
    }

    #[test]
    fn serializes_externally_tagged() {
        let err = StatsError::Upstream { status: 404, message: "Not Found".into() };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({"Upstream": {"status": 404, "message": "Not Found"}}));
        let back: StatsError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
