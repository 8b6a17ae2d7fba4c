//! Wire types for the X/Twitter v2 endpoints used by the client.

use serde::Deserialize;

/// `GET /2/users/by/username/{handle}` body.
///
/// Unknown handles come back as HTTP 200 with `errors` and no `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserLookupResponse {
    #[serde(default)]
    pub data: Option<UserData>,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Entry of the v2 `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiProblem {
    #[must_use]
    pub fn summary(&self) -> String {
        match (&self.title, &self.detail) {
            (_, Some(detail)) => detail.clone(),
            (Some(title), None) => title.clone(),
            (None, None) => "unspecified API error".to_string(),
        }
    }
}

/// `GET /2/users/{id}/tweets` body. `data` is absent when there are no
/// results.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub data: Option<Vec<RawPost>>,
    #[serde(default)]
    pub meta: Option<TimelineMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineMeta {
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// A post as returned by the timeline endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub public_metrics: Option<PublicMetrics>,
    #[serde(default)]
    pub organic_metrics: Option<OrganicMetrics>,
}

/// Public engagement counts. Signed so malformed negative values survive
/// decoding and can be clamped by the normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub retweet_count: i64,
    #[serde(default)]
    pub reply_count: i64,
    #[serde(default)]
    pub quote_count: i64,
}

/// The `organic_metrics` substructure, which is only meaningful when it is
/// a JSON object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OrganicMetrics {
    Mapping(serde_json::Map<String, serde_json::Value>),
    Other(serde_json::Value),
}

impl OrganicMetrics {
    /// `impression_count` when this is a mapping holding an integer under
    /// that key; `None` otherwise.
    #[must_use]
    pub fn impression_count(&self) -> Option<i64> {
        match self {
            OrganicMetrics::Mapping(map) => {
                map.get("impression_count").and_then(serde_json::Value::as_i64)
            }
            OrganicMetrics::Other(_) => None,
        }
    }
}
