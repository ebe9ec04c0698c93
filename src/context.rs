//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::adapters::live::{GitHubSource, LiveClock, LiveFileSystem};
use crate::adapters::recording::{RecordingClock, RecordingCommitSource};
use crate::adapters::replaying::{ReplayingClock, ReplayingCommitSource};
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::Cassette;
use crate::config::Settings;
use crate::error::{Result, StatsError};
use crate::fetch::{CommitFetcher, DiffStatCache, FetchOptions};
use crate::model::RangeSummary;
use crate::ports::{Clock, CommitSource, DayCacheStore};
use crate::resolve::DayCacheResolver;
use crate::store::FileDayCache;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
/// The diff-stat memo lives here so it outlasts individual resolutions.
pub struct ServiceContext {
    /// Clock deciding which day is today.
    pub clock: Box<dyn Clock>,
    /// Remote commit source.
    pub source: Box<dyn CommitSource>,
    /// Day cache; `None` fetches every range directly.
    pub store: Option<Box<dyn DayCacheStore>>,
    /// Diff-stat memo shared by every fetch made through this context.
    pub memo: DiffStatCache,
    /// Fetcher tuning.
    pub options: FetchOptions,
    /// Optional cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context from explicit ports.
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        source: Box<dyn CommitSource>,
        store: Option<Box<dyn DayCacheStore>>,
        settings: &Settings,
    ) -> Self {
        Self {
            clock,
            source,
            store,
            memo: DiffStatCache::new(settings.memo_capacity),
            options: FetchOptions { strategy: settings.strategy, concurrency: settings.concurrency },
            recorder: None,
        }
    }

    /// Creates a live context talking to GitHub.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(settings: &Settings) -> Result<Self> {
        let source = GitHubSource::new(&settings.api_url, settings.github_token.clone())?;
        Ok(Self::new(Box::new(LiveClock), Box::new(source), file_store(settings), settings))
    }

    /// Creates a recording context that writes a cassette file on drop.
    ///
    /// Uses live adapters for actual work; clock readings and every GitHub
    /// call are captured to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn recording(settings: &Settings, path: &Path) -> Result<Self> {
        let source = GitHubSource::new(&settings.api_url, settings.github_token.clone())?;
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "ghtally-session")));
        let mut ctx = Self::new(
            Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder))),
            Box::new(RecordingCommitSource::new(Box::new(source), Arc::clone(&recorder))),
            file_store(settings),
            settings,
        );
        ctx.recorder = Some(recorder);
        Ok(ctx)
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// The clock and the commit source each get their own replayer over
    /// the same cassette. The day cache follows `settings` as in a live run.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(settings: &Settings, path: &Path) -> Result<Self> {
        let cassette = Cassette::load(path).map_err(StatsError::Replay)?;
        info!(cassette = %cassette.name, interactions = cassette.interactions.len(), "replaying");
        Ok(Self::new(
            Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            Box::new(ReplayingCommitSource::new(CassetteReplayer::new(&cassette))),
            file_store(settings),
            settings,
        ))
    }

    /// Fetcher over this context's source and memo.
    #[must_use]
    pub fn fetcher(&self) -> CommitFetcher<'_> {
        CommitFetcher::new(self.source.as_ref(), &self.memo, self.options)
    }

    /// Resolves the summary for `username` over `[from, to]`.
    ///
    /// # Errors
    ///
    /// Propagates resolver failures.
    pub async fn resolve(&self, username: &str, from: NaiveDate, to: NaiveDate) -> Result<RangeSummary> {
        let fetcher = self.fetcher();
        let resolver = DayCacheResolver::new(&fetcher, self.store.as_deref(), self.clock.as_ref());
        resolver.resolve(username, from, to).await
    }
}

fn file_store(settings: &Settings) -> Option<Box<dyn DayCacheStore>> {
    settings.cache_dir.as_deref().map(|dir| {
        Box::new(FileDayCache::new(Box::new(LiveFileSystem), dir)) as Box<dyn DayCacheStore>
    })
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let guard = recorder.lock().expect("recorder lock poisoned");
            match guard.save() {
                Ok(path) => info!(path = %path.display(), interactions = guard.len(), "cassette written"),
                Err(e) => warn!("failed to write cassette: {e}"),
            }
        }
    }
}
