//! Persisted handle → user-id mapping, one JSON file per handle.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::atomic::write_atomically;
use crate::error::StoreError;

#[derive(Serialize)]
struct CachedIdentityOut<'a> {
    user_id: &'a str,
}

#[derive(Deserialize)]
struct CachedIdentityIn {
    #[serde(default)]
    user_id: Option<serde_json::Value>,
}

/// `{"user_id": "<id>"}` document. No TTL: an entry is valid until the file
/// is deleted.
#[derive(Debug, Clone)]
pub struct IdentityCache {
    path: PathBuf,
}

impl IdentityCache {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached user id, or `None` if no usable entry exists.
    ///
    /// A file with a missing, null, or empty `user_id` counts as no entry.
    /// Numeric ids are accepted and rendered as strings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Json`] if it is not a JSON object.
    pub fn load(&self) -> Result<Option<String>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let cached: CachedIdentityIn =
            serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        let user_id = match cached.user_id {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Ok(user_id.filter(|id| !id.trim().is_empty()))
    }

    /// Writes `user_id`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] or [`StoreError::Json`] if the file cannot
    /// be written.
    pub fn save(&self, user_id: &str) -> Result<(), StoreError> {
        let body = serde_json::to_vec(&CachedIdentityOut { user_id }).map_err(|source| {
            StoreError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        write_atomically(&self.path, |file| {
            file.write_all(&body).map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
        })?;
        tracing::debug!(path = %self.path.display(), "identity cache written");
        Ok(())
    }
}
