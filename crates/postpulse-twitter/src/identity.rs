//! Handle → user-id resolution backed by the persisted identity cache.

use postpulse_core::Identity;
use postpulse_store::IdentityCache;

use crate::client::TwitterClient;
use crate::error::TwitterError;

/// Resolves a handle to its stable user id, calling the API at most once
/// per cache lifetime.
///
/// A cached id is trusted indefinitely and for whatever handle is asked;
/// deleting the cache file is the only way to force a fresh lookup.
pub struct IdentityResolver<'a> {
    client: &'a TwitterClient,
    cache: IdentityCache,
}

impl<'a> IdentityResolver<'a> {
    #[must_use]
    pub fn new(client: &'a TwitterClient, cache: IdentityCache) -> Self {
        Self { client, cache }
    }

    /// Returns the identity for `handle`, from cache when possible.
    ///
    /// An unreadable cache is treated as a miss. After a successful lookup
    /// the id is written to the cache; a failed write is logged and does not
    /// fail resolution.
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Resolution`] if the lookup does not succeed,
    /// or [`TwitterError::Http`] / [`TwitterError::Deserialize`] on
    /// transport or decoding failures.
    pub async fn resolve(&self, handle: &str) -> Result<Identity, TwitterError> {
        match self.cache.load() {
            Ok(Some(id)) => {
                tracing::info!(handle, user_id = %id, "using cached user id");
                return Ok(Identity {
                    handle: handle.to_owned(),
                    id,
                });
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    handle,
                    error = %e,
                    "identity cache unreadable; looking up user id"
                );
            }
        }

        let id = self.client.lookup_user_id(handle).await?;
        tracing::info!(handle, user_id = %id, "resolved user id");

        if let Err(e) = self.cache.save(&id) {
            tracing::warn!(handle, error = %e, "failed to persist user id");
        }

        Ok(Identity {
            handle: handle.to_owned(),
            id,
        })
    }
}
