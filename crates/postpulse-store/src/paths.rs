use std::path::{Path, PathBuf};

use crate::identity_cache::IdentityCache;
use crate::snapshot::SnapshotStore;

/// File locations for one configured handle.
///
/// `{data_dir}/{handle}_tweets.csv` and `{data_dir}/{handle}_user_id.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub snapshot: PathBuf,
    pub identity_cache: PathBuf,
}

impl ArtifactPaths {
    #[must_use]
    pub fn for_handle(data_dir: &Path, handle: &str) -> Self {
        let stem = file_stem(handle);
        Self {
            snapshot: data_dir.join(format!("{stem}_tweets.csv")),
            identity_cache: data_dir.join(format!("{stem}_user_id.json")),
        }
    }

    #[must_use]
    pub fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::new(self.snapshot.clone())
    }

    #[must_use]
    pub fn identity_cache(&self) -> IdentityCache {
        IdentityCache::new(self.identity_cache.clone())
    }
}

/// Handles are `[A-Za-z0-9_]`; anything else is replaced so a bad value
/// can never escape `data_dir`.
fn file_stem(handle: &str) -> String {
    let stem: String = handle
        .trim()
        .trim_start_matches('@')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "account".to_string()
    } else {
        stem
    }
}
