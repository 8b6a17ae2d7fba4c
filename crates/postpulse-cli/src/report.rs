//! Engagement summaries rendered from a published dataset.
//!
//! Totals and means are computed here from the dataset itself; the
//! acquisition pipeline only hands over rows.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use postpulse_core::{Metric, PostDataset, PostMetrics};

use crate::acquire::{DataSource, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MetricSummary {
    pub metric: Metric,
    pub total: u64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EngagementSummary {
    pub rows: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub metrics: Vec<MetricSummary>,
}

#[cfg(test)]
impl EngagementSummary {
    pub(crate) fn get(&self, metric: Metric) -> Option<&MetricSummary> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

/// Per-metric sum and mean. Means of an empty dataset are `0.0`.
pub(crate) fn summarize(dataset: &PostDataset) -> EngagementSummary {
    let rows = dataset.len();
    let metrics = Metric::ALL
        .iter()
        .map(|&metric| {
            let total = dataset
                .iter()
                .map(|p| p.metrics.get(metric))
                .fold(0u64, u64::saturating_add);
            #[allow(clippy::cast_precision_loss)]
            let mean = if rows == 0 {
                0.0
            } else {
                total as f64 / rows as f64
            };
            MetricSummary {
                metric,
                total,
                mean,
            }
        })
        .collect();

    EngagementSummary {
        rows,
        date_range: dataset.date_range(),
        metrics,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DailyTotals {
    pub date: NaiveDate,
    pub posts: usize,
    pub totals: PostMetrics,
}

/// Metric sums grouped by `date_only`, newest day first.
pub(crate) fn daily_rollup(dataset: &PostDataset) -> Vec<DailyTotals> {
    let mut by_day: BTreeMap<NaiveDate, DailyTotals> = BTreeMap::new();
    for post in dataset {
        let day = by_day
            .entry(post.date_only())
            .or_insert_with(|| DailyTotals {
                date: post.date_only(),
                posts: 0,
                totals: PostMetrics::default(),
            });
        day.posts += 1;
        let t = &mut day.totals;
        t.like_count = t.like_count.saturating_add(post.metrics.like_count);
        t.retweet_count = t.retweet_count.saturating_add(post.metrics.retweet_count);
        t.reply_count = t.reply_count.saturating_add(post.metrics.reply_count);
        t.quote_count = t.quote_count.saturating_add(post.metrics.quote_count);
        t.impression_count = t
            .impression_count
            .saturating_add(post.metrics.impression_count);
    }
    by_day.into_values().rev().collect()
}

/// Plain-text report for stdout.
pub(crate) fn render(handle: &str, snapshot: &Snapshot, include_daily: bool) -> String {
    let summary = summarize(&snapshot.dataset);
    let mut out = String::new();

    let range = summary.date_range.map_or_else(
        || "N/A".to_string(),
        |(min, max)| format!("{} - {}", min.format("%Y-%m-%d"), max.format("%Y-%m-%d")),
    );
    let _ = writeln!(out, "@{handle} post stats [{range}]");
    let _ = writeln!(
        out,
        "source: {} ({} posts, acquired {})",
        snapshot.source,
        summary.rows,
        snapshot.acquired_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if snapshot.source == DataSource::Cache {
        if let Some(reason) = &snapshot.fallback_reason {
            let _ = writeln!(out, "fallback: {reason}");
        }
    }
    out.push('\n');

    let _ = writeln!(out, "{:<14}{:>14}{:>14}", "METRIC", "TOTAL", "AVG");
    for m in &summary.metrics {
        let _ = writeln!(
            out,
            "{:<14}{:>14}{:>14.1}",
            m.metric.to_string(),
            m.total,
            m.mean
        );
    }

    if include_daily {
        out.push('\n');
        let _ = writeln!(
            out,
            "{:<12}{:>7}{:>13}{:>9}{:>10}{:>9}{:>8}",
            "DATE", "POSTS", "IMPRESSIONS", "LIKES", "RETWEETS", "REPLIES", "QUOTES"
        );
        for day in daily_rollup(&snapshot.dataset) {
            let _ = writeln!(
                out,
                "{:<12}{:>7}{:>13}{:>9}{:>10}{:>9}{:>8}",
                day.date.format("%Y-%m-%d").to_string(),
                day.posts,
                day.totals.impression_count,
                day.totals.like_count,
                day.totals.retweet_count,
                day.totals.reply_count,
                day.totals.quote_count
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use postpulse_core::NormalizedPost;

    use super::*;

    fn post(day: u32, hour: u32, likes: u64, retweets: u64, impressions: u64) -> NormalizedPost {
        NormalizedPost::new(
            None,
            Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0).unwrap(),
            PostMetrics {
                like_count: likes,
                retweet_count: retweets,
                reply_count: 1,
                quote_count: 0,
                impression_count: impressions,
            },
        )
    }

    fn sample() -> PostDataset {
        PostDataset::new(vec![
            post(1, 9, 5, 2, 100),
            post(1, 18, 0, 3, 50),
            post(3, 7, 10, 0, 0),
        ])
    }

    #[test]
    fn summarize_computes_totals_and_means() {
        let summary = summarize(&sample());
        assert_eq!(summary.rows, 3);

        let likes = summary.get(Metric::Like).unwrap();
        assert_eq!(likes.total, 15);
        assert!((likes.mean - 5.0).abs() < f64::EPSILON);

        let impressions = summary.get(Metric::Impression).unwrap();
        assert_eq!(impressions.total, 150);
        assert!((impressions.mean - 50.0).abs() < f64::EPSILON);

        let replies = summary.get(Metric::Reply).unwrap();
        assert_eq!(replies.total, 3);
    }

    #[test]
    fn summarize_empty_dataset_has_zero_means() {
        let summary = summarize(&PostDataset::empty());
        assert_eq!(summary.rows, 0);
        assert!(summary.date_range.is_none());
        assert!(summary.metrics.iter().all(|m| m.total == 0 && m.mean.abs() < f64::EPSILON));
    }

    #[test]
    fn daily_rollup_groups_by_date_newest_first() {
        let days = daily_rollup(&sample());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 5, 3).unwrap());
        assert_eq!(days[0].posts, 1);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(days[1].posts, 2);
        assert_eq!(days[1].totals.like_count, 5);
        assert_eq!(days[1].totals.retweet_count, 5);
        assert_eq!(days[1].totals.impression_count, 150);
    }

    #[test]
    fn render_shows_range_source_and_fallback_reason() {
        let snapshot = Snapshot {
            dataset: sample(),
            source: DataSource::Cache,
            acquired_at: Utc.with_ymd_and_hms(2025, 5, 4, 0, 0, 0).unwrap(),
            fallback_reason: Some("post fetch failed: rate limited".to_string()),
        };
        let text = render("someone", &snapshot, true);

        assert!(text.starts_with("@someone post stats [2025-05-01 - 2025-05-03]"));
        assert!(text.contains("source: cached snapshot (3 posts"));
        assert!(text.contains("fallback: post fetch failed: rate limited"));
        assert!(text.contains("DATE"));
        assert!(text.contains("2025-05-03"));
    }

    #[test]
    fn render_without_daily_omits_rollup() {
        let snapshot = Snapshot {
            dataset: sample(),
            source: DataSource::Fresh,
            acquired_at: Utc::now(),
            fallback_reason: None,
        };
        let text = render("someone", &snapshot, false);
        assert!(!text.contains("IMPRESSIONS"));
        assert!(!text.contains("fallback:"));
    }
}
