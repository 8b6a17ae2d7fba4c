pub mod client;
pub mod error;
pub mod identity;
pub mod normalize;
pub mod rate_limit;
pub mod types;

pub use client::{TwitterClient, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
pub use error::TwitterError;
pub use identity::IdentityResolver;
pub use normalize::normalize_posts;
pub use rate_limit::{interpret, RateLimitQuota, RateLimitSignal};
pub use types::{OrganicMetrics, PublicMetrics, RawPost};
