//! Durable artifacts for `postpulse`: the CSV dataset snapshot and the
//! per-handle identity cache.
//!
//! Both artifacts are replaced wholesale on write (temp file in the same
//! directory, then rename) so a reader never observes a half-written file.

pub mod error;
pub mod identity_cache;
pub mod paths;
pub mod snapshot;

mod atomic;

pub use error::StoreError;
pub use identity_cache::IdentityCache;
pub use paths::ArtifactPaths;
pub use snapshot::{SnapshotStore, SNAPSHOT_COLUMNS};
