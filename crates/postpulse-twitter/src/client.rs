//! HTTP client for the X/Twitter v2 REST API.
//!
//! Wraps `reqwest` with bearer authentication and typed errors for the two
//! endpoints the acquisition cycle needs: user lookup by handle and one page
//! of a user's posts. No request is retried here.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, StatusCode, Url};

use crate::error::TwitterError;
use crate::rate_limit::{interpret, RateLimitQuota};
use crate::types::{RawPost, TimelineResponse, UserLookupResponse};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/2/";

/// Largest page the timeline endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Smallest page the timeline endpoint accepts.
pub const MIN_PAGE_SIZE: u32 = 5;

const TWEET_FIELDS: &str = "created_at,public_metrics,organic_metrics";
const EXCLUDE: &str = "retweets,replies";

/// Client for the X/Twitter v2 API.
///
/// Use [`TwitterClient::new`] for production or
/// [`TwitterClient::with_base_url`] to point at a mock server in tests.
pub struct TwitterClient {
    client: Client,
    bearer_token: String,
    base_url: Url,
}

impl TwitterClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, TwitterError> {
        Self::with_base_url(bearer_token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TwitterError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`TwitterError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute `http(s)` URL.
    pub fn with_base_url(
        bearer_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, TwitterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let invalid = |reason: String| TwitterError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        // Exactly one trailing slash so endpoint paths extend the base path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        Ok(Self {
            client,
            bearer_token: bearer_token.to_owned(),
            base_url: parsed,
        })
    }

    /// Looks up the numeric user id for `handle`.
    ///
    /// # Errors
    ///
    /// - [`TwitterError::Resolution`] on any non-2xx status, or a 2xx body
    ///   without `data.id`.
    /// - [`TwitterError::Http`] on network failure.
    /// - [`TwitterError::Deserialize`] if the body is not a lookup response.
    pub async fn lookup_user_id(&self, handle: &str) -> Result<String, TwitterError> {
        let url = self.endpoint(&["users", "by", "username", handle]);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let mut reason = format!("lookup returned HTTP {}", status.as_u16());
            if status == StatusCode::TOO_MANY_REQUESTS {
                if let Some(signal) = interpret(response.headers(), Utc::now()) {
                    reason.push_str(&format!(" ({signal})"));
                }
            }
            return Err(TwitterError::Resolution {
                handle: handle.to_owned(),
                reason,
            });
        }

        let body = response.text().await?;
        let lookup: UserLookupResponse =
            serde_json::from_str(&body).map_err(|e| TwitterError::Deserialize {
                context: format!("user lookup for @{handle}"),
                source: e,
            })?;

        match lookup.data {
            Some(user) if !user.id.trim().is_empty() => Ok(user.id),
            _ => {
                let reason = lookup.errors.first().map_or_else(
                    || "response contained no user data".to_string(),
                    crate::types::ApiProblem::summary,
                );
                Err(TwitterError::Resolution {
                    handle: handle.to_owned(),
                    reason,
                })
            }
        }
    }

    /// Fetches one page of `user_id`'s original posts (no reposts, no
    /// replies) with creation time and engagement metrics.
    ///
    /// `max_results` is clamped to `MIN_PAGE_SIZE..=MAX_PAGE_SIZE`. A page
    /// without `data` is an empty vec.
    ///
    /// # Errors
    ///
    /// - [`TwitterError::RateLimited`] on HTTP 429 (not retried).
    /// - [`TwitterError::Fetch`] on any other non-2xx status.
    /// - [`TwitterError::Http`] on network failure.
    /// - [`TwitterError::Deserialize`] if the body does not decode.
    pub async fn fetch_posts(
        &self,
        user_id: &str,
        max_results: u32,
    ) -> Result<Vec<RawPost>, TwitterError> {
        let url = self.timeline_url(user_id, max_results);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;
        let status = response.status();

        let quota = RateLimitQuota::from_headers(response.headers());
        tracing::debug!(
            user_id,
            status = status.as_u16(),
            limit = ?quota.limit,
            remaining = ?quota.remaining,
            "timeline response received"
        );

        if status == StatusCode::TOO_MANY_REQUESTS {
            let signal = interpret(response.headers(), Utc::now());
            return Err(TwitterError::RateLimited { signal });
        }

        if !status.is_success() {
            return Err(TwitterError::Fetch {
                status_code: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let page: TimelineResponse =
            serde_json::from_str(&body).map_err(|e| TwitterError::Deserialize {
                context: format!("timeline page for user {user_id}"),
                source: e,
            })?;

        if page.meta.as_ref().and_then(|m| m.next_token.as_ref()).is_some() {
            tracing::debug!(user_id, "more pages available; only the first is fetched");
        }

        Ok(page.data.unwrap_or_default())
    }

    /// Builds the timeline URL with its fixed field and exclusion params.
    fn timeline_url(&self, user_id: &str, max_results: u32) -> Url {
        let mut url = self.endpoint(&["users", user_id, "tweets"]);
        url.query_pairs_mut()
            .append_pair("max_results", &clamp_page_size(max_results).to_string())
            .append_pair("tweet.fields", TWEET_FIELDS)
            .append_pair("exclude", EXCLUDE);
        url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // The base URL was checked to be http(s) in the constructor, so it
        // always has path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Clamps a requested page size into the range the API accepts.
#[must_use]
pub fn clamp_page_size(requested: u32) -> u32 {
    requested.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> TwitterClient {
        TwitterClient::with_base_url("test-token", 30, "postpulse-test", base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn clamp_page_size_caps_at_one_hundred() {
        assert_eq!(clamp_page_size(250), 100);
        assert_eq!(clamp_page_size(90), 90);
        assert_eq!(clamp_page_size(0), 5);
    }

    #[test]
    fn timeline_url_includes_fields_and_exclusions() {
        let client = test_client("https://api.twitter.com/2");
        let url = client.timeline_url("12345", 500);
        assert_eq!(
            url.as_str(),
            "https://api.twitter.com/2/users/12345/tweets?max_results=100\
             &tweet.fields=created_at%2Cpublic_metrics%2Corganic_metrics\
             &exclude=retweets%2Creplies"
        );
    }

    #[test]
    fn endpoint_handles_trailing_slash_in_base() {
        let client = test_client("https://api.twitter.com/2/");
        let url = client.endpoint(&["users", "by", "username", "someone"]);
        assert_eq!(
            url.as_str(),
            "https://api.twitter.com/2/users/by/username/someone"
        );
    }

    #[test]
    fn endpoint_percent_encodes_segments() {
        let client = test_client("https://api.twitter.com/2");
        let url = client.endpoint(&["users", "by", "username", "a/b c"]);
        assert_eq!(
            url.as_str(),
            "https://api.twitter.com/2/users/by/username/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        let result = TwitterClient::with_base_url("t", 30, "ua", "ftp://example.com");
        assert!(
            matches!(result, Err(TwitterError::InvalidBaseUrl { .. })),
            "expected InvalidBaseUrl"
        );
    }

    #[test]
    fn rejects_unparsable_base_url() {
        let result = TwitterClient::with_base_url("t", 30, "ua", "not a url");
        assert!(matches!(result, Err(TwitterError::InvalidBaseUrl { .. })));
    }
}
