//! Normalized post rows and the dataset they form.
//!
//! A [`PostDataset`] is produced whole by one acquisition cycle (fresh from
//! the API or reloaded from the snapshot) and is never merged or partially
//! updated afterwards.

use chrono::{DateTime, NaiveDate, Timelike, Utc};

/// A resolved account: the human-readable handle and its stable numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub handle: String,
    pub id: String,
}

/// Engagement metric columns, in snapshot column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Like,
    Retweet,
    Reply,
    Quote,
    Impression,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Like,
        Metric::Retweet,
        Metric::Reply,
        Metric::Quote,
        Metric::Impression,
    ];

    /// Column name used in the snapshot file.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Metric::Like => "like_count",
            Metric::Retweet => "retweet_count",
            Metric::Reply => "reply_count",
            Metric::Quote => "quote_count",
            Metric::Impression => "impression_count",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Like => write!(f, "likes"),
            Metric::Retweet => write!(f, "retweets"),
            Metric::Reply => write!(f, "replies"),
            Metric::Quote => write!(f, "quotes"),
            Metric::Impression => write!(f, "impressions"),
        }
    }
}

/// Non-negative engagement counts for a single post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostMetrics {
    pub like_count: u64,
    pub retweet_count: u64,
    pub reply_count: u64,
    pub quote_count: u64,
    pub impression_count: u64,
}

impl PostMetrics {
    #[must_use]
    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Like => self.like_count,
            Metric::Retweet => self.retweet_count,
            Metric::Reply => self.reply_count,
            Metric::Quote => self.quote_count,
            Metric::Impression => self.impression_count,
        }
    }
}

/// Calendar date and hour-of-day (UTC) for a post timestamp.
///
/// The only source of `date_only`/`hour` values anywhere in the workspace.
#[must_use]
pub fn derive_date_hour(created_at: &DateTime<Utc>) -> (NaiveDate, u32) {
    (created_at.date_naive(), created_at.hour())
}

/// Parse an ISO-8601 timestamp into UTC.
///
/// Accepts RFC 3339 (`2025-01-01T12:00:00.000Z`, as the API sends it) and
/// the space-separated offset form (`2025-01-01 12:00:00+00:00`) found in
/// older snapshot files. Returns `None` for anything else.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// One row of the normalized dataset.
///
/// `date_only` and `hour` are private and always derived from `created_at`
/// in [`NormalizedPost::new`], so they cannot drift from the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPost {
    pub id: Option<String>,
    created_at: DateTime<Utc>,
    date_only: NaiveDate,
    hour: u32,
    pub metrics: PostMetrics,
}

impl NormalizedPost {
    #[must_use]
    pub fn new(id: Option<String>, created_at: DateTime<Utc>, metrics: PostMetrics) -> Self {
        let (date_only, hour) = derive_date_hour(&created_at);
        Self {
            id,
            created_at,
            date_only,
            hour,
            metrics,
        }
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn date_only(&self) -> NaiveDate {
        self.date_only
    }

    /// Hour of day, `0..=23`.
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.hour
    }
}

/// The full normalized dataset handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDataset {
    posts: Vec<NormalizedPost>,
}

impl PostDataset {
    #[must_use]
    pub fn new(posts: Vec<NormalizedPost>) -> Self {
        Self { posts }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    #[must_use]
    pub fn posts(&self) -> &[NormalizedPost] {
        &self.posts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedPost> {
        self.posts.iter()
    }

    /// All values of one metric column, in row order.
    #[must_use]
    pub fn column(&self, metric: Metric) -> Vec<u64> {
        self.posts.iter().map(|p| p.metrics.get(metric)).collect()
    }

    /// Earliest and latest `date_only` in the dataset, or `None` when empty.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.posts.iter().map(NormalizedPost::date_only).min()?;
        let max = self.posts.iter().map(NormalizedPost::date_only).max()?;
        Some((min, max))
    }
}

impl<'a> IntoIterator for &'a PostDataset {
    type Item = &'a NormalizedPost;
    type IntoIter = std::slice::Iter<'a, NormalizedPost>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}
