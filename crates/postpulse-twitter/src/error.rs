use thiserror::Error;

use crate::rate_limit::RateLimitSignal;

/// Errors returned by the X/Twitter API client and normalizer.
///
/// Every variant is recoverable at the acquisition level: the caller falls
/// back to the persisted snapshot.
#[derive(Debug, Error)]
pub enum TwitterError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The user lookup did not produce an id.
    #[error("failed to resolve user id for @{handle}: {reason}")]
    Resolution { handle: String, reason: String },

    /// HTTP 429. `signal` is `None` when the reset time was missing or
    /// unparsable, which means "unknown", not "no wait".
    #[error("rate limited by upstream API ({})", describe_signal(.signal.as_ref()))]
    RateLimited { signal: Option<RateLimitSignal> },

    /// Any other non-2xx response from the timeline endpoint.
    #[error("post fetch failed with HTTP status {status_code}")]
    Fetch { status_code: u16 },

    #[error("malformed post {post_id}: {reason}")]
    Normalization { post_id: String, reason: String },

    #[error("invalid API base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

fn describe_signal(signal: Option<&RateLimitSignal>) -> String {
    match signal {
        Some(signal) => signal.to_string(),
        None => "reset time unknown".to_string(),
    }
}
