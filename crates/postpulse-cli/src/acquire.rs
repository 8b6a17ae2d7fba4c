//! One acquisition cycle: resolve identity, fetch, normalize, persist, and
//! fall back to the last snapshot when any of those steps fails.
//!
//! [`AcquisitionOrchestrator::run`] drives the cycle from `Acquiring` to
//! `Ready`. `Ok(Snapshot)` is the `Ready` state; the only error it returns is
//! [`AcquireError::NoDataAvailable`], raised when neither fresh nor cached
//! data exists.

use std::path::Path;

use chrono::{DateTime, Utc};
use postpulse_core::{AppConfig, PostDataset};
use postpulse_store::{ArtifactPaths, SnapshotStore};
use postpulse_twitter::{normalize_posts, IdentityResolver, TwitterClient, TwitterError};
use thiserror::Error;

/// Where the published dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataSource {
    Fresh,
    Cache,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Fresh => write!(f, "fresh"),
            DataSource::Cache => write!(f, "cached snapshot"),
        }
    }
}

/// The immutable dataset published to presentation once a cycle is `Ready`.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub dataset: PostDataset,
    pub source: DataSource,
    pub acquired_at: DateTime<Utc>,
    /// Set when `source` is [`DataSource::Cache`].
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Error)]
pub(crate) enum AcquireError {
    /// Fatal: terminates the process.
    #[error("no usable data available: {reason}")]
    NoDataAvailable { reason: String },
}

/// Why the cycle fell back to the persisted snapshot.
#[derive(Debug)]
pub(crate) enum FallbackReason {
    Resolution(TwitterError),
    Fetch(TwitterError),
    EmptyFetch,
    Normalization(TwitterError),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::Resolution(e) => write!(f, "identity resolution failed: {e}"),
            FallbackReason::Fetch(e) => write!(f, "post fetch failed: {e}"),
            FallbackReason::EmptyFetch => write!(f, "fetch returned no posts"),
            FallbackReason::Normalization(e) => write!(f, "post data was malformed: {e}"),
        }
    }
}

/// Per-cycle inputs: the resolved handle plus [`AppConfig`] settings.
#[derive(Debug, Clone)]
pub(crate) struct AcquireSettings {
    pub handle: String,
    pub max_results: u32,
    pub empty_fetch_fallback: bool,
}

impl AcquireSettings {
    pub(crate) fn new(handle: String, config: &AppConfig) -> Self {
        Self {
            handle,
            max_results: config.max_results,
            empty_fetch_fallback: config.empty_fetch_fallback,
        }
    }
}

pub(crate) struct AcquisitionOrchestrator {
    client: TwitterClient,
    settings: AcquireSettings,
    paths: ArtifactPaths,
}

impl AcquisitionOrchestrator {
    pub(crate) fn new(client: TwitterClient, settings: AcquireSettings, data_dir: &Path) -> Self {
        let paths = ArtifactPaths::for_handle(data_dir, &settings.handle);
        Self {
            client,
            settings,
            paths,
        }
    }

    /// Runs the cycle to `Ready`, consuming the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::NoDataAvailable`] when the fresh path failed
    /// (or was empty) and no non-empty snapshot can be loaded.
    pub(crate) async fn run(self) -> Result<Snapshot, AcquireError> {
        let handle = self.settings.handle.as_str();
        tracing::info!(handle, max_results = self.settings.max_results, "acquisition started");

        let snapshot_store = self.paths.snapshot_store();
        match self.acquire_fresh().await {
            Ok(dataset) => {
                if dataset.is_empty() {
                    tracing::info!(handle, "fetch returned no posts; publishing empty dataset");
                } else if let Err(e) = snapshot_store.save(&dataset) {
                    tracing::warn!(
                        handle,
                        error = %e,
                        "failed to persist snapshot; publishing fresh data anyway"
                    );
                }
                tracing::info!(handle, rows = dataset.len(), "acquisition ready with fresh data");
                Ok(Snapshot {
                    dataset,
                    source: DataSource::Fresh,
                    acquired_at: Utc::now(),
                    fallback_reason: None,
                })
            }
            Err(reason) => fall_back(handle, &snapshot_store, &reason),
        }
    }

    async fn acquire_fresh(&self) -> Result<PostDataset, FallbackReason> {
        let resolver = IdentityResolver::new(&self.client, self.paths.identity_cache());
        let identity = resolver
            .resolve(&self.settings.handle)
            .await
            .map_err(FallbackReason::Resolution)?;

        tracing::info!(handle = %identity.handle, user_id = %identity.id, "requesting latest posts");
        let posts = self
            .client
            .fetch_posts(&identity.id, self.settings.max_results)
            .await
            .map_err(FallbackReason::Fetch)?;

        if posts.is_empty() && self.settings.empty_fetch_fallback {
            return Err(FallbackReason::EmptyFetch);
        }

        normalize_posts(posts).map_err(FallbackReason::Normalization)
    }
}

fn fall_back(
    handle: &str,
    store: &SnapshotStore,
    reason: &FallbackReason,
) -> Result<Snapshot, AcquireError> {
    if let FallbackReason::Fetch(TwitterError::RateLimited {
        signal: Some(signal),
    }) = reason
    {
        tracing::warn!(
            handle,
            wait_seconds = signal.wait_seconds,
            reset_at = %signal.reset_at,
            "rate limited; next attempt should wait for the reset"
        );
    }
    tracing::warn!(handle, reason = %reason, "fresh acquisition failed; loading snapshot");

    let dataset = store.load().map_err(|e| AcquireError::NoDataAvailable {
        reason: format!("{reason}; snapshot unreadable: {e}"),
    })?;

    if dataset.is_empty() {
        return Err(AcquireError::NoDataAvailable {
            reason: format!(
                "{reason}; no snapshot at {}",
                store.path().display()
            ),
        });
    }

    tracing::warn!(handle, rows = dataset.len(), "using cached snapshot");
    Ok(Snapshot {
        dataset,
        source: DataSource::Cache,
        acquired_at: Utc::now(),
        fallback_reason: Some(reason.to_string()),
    })
}

#[cfg(test)]
#[path = "acquire_test.rs"]
mod tests;
