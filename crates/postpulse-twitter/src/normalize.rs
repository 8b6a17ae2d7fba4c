//! Normalization from raw timeline posts to a [`PostDataset`].
//!
//! Flattens `public_metrics`, pulls impressions out of `organic_metrics`,
//! clamps every count to zero or above, and derives `date_only`/`hour`
//! from `created_at`.

use postpulse_core::{parse_timestamp, NormalizedPost, PostDataset, PostMetrics};

use crate::error::TwitterError;
use crate::types::RawPost;

/// Normalizes a page of raw posts, preserving their order.
///
/// An empty page yields an empty dataset.
///
/// # Errors
///
/// Returns [`TwitterError::Normalization`] if any post is missing
/// `created_at` or carries a value that is not an ISO-8601 timestamp.
pub fn normalize_posts(posts: Vec<RawPost>) -> Result<PostDataset, TwitterError> {
    let rows = posts
        .into_iter()
        .map(normalize_post)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PostDataset::new(rows))
}

fn normalize_post(post: RawPost) -> Result<NormalizedPost, TwitterError> {
    let post_id = post.id.clone().unwrap_or_else(|| "<no id>".to_string());

    let raw_created_at = post
        .created_at
        .as_deref()
        .ok_or_else(|| TwitterError::Normalization {
            post_id: post_id.clone(),
            reason: "missing created_at".to_string(),
        })?;
    let created_at =
        parse_timestamp(raw_created_at).ok_or_else(|| TwitterError::Normalization {
            post_id: post_id.clone(),
            reason: format!("created_at '{raw_created_at}' is not an ISO-8601 timestamp"),
        })?;

    let public = post.public_metrics.unwrap_or_default();
    let impressions = post
        .organic_metrics
        .as_ref()
        .and_then(crate::types::OrganicMetrics::impression_count)
        .unwrap_or(0);

    let metrics = PostMetrics {
        like_count: clamp_count(public.like_count),
        retweet_count: clamp_count(public.retweet_count),
        reply_count: clamp_count(public.reply_count),
        quote_count: clamp_count(public.quote_count),
        impression_count: clamp_count(impressions),
    };

    Ok(NormalizedPost::new(post.id, created_at, metrics))
}

/// Negative counts from upstream become zero.
#[must_use]
pub fn clamp_count(raw: i64) -> u64 {
    raw.max(0).unsigned_abs()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
