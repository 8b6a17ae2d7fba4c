//! CSV snapshot of the normalized dataset.

use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use postpulse_core::{parse_timestamp, Metric, NormalizedPost, PostDataset, PostMetrics};
use serde::{Deserialize, Serialize};

use crate::atomic::write_atomically;
use crate::error::StoreError;

/// Header row of the snapshot file, in order.
pub const SNAPSHOT_COLUMNS: [&str; 9] = [
    "id",
    "created_at",
    "date_only",
    "hour",
    Metric::Like.column(),
    Metric::Retweet.column(),
    Metric::Reply.column(),
    Metric::Quote.column(),
    Metric::Impression.column(),
];

#[derive(Serialize)]
struct SnapshotRowOut<'a> {
    id: Option<&'a str>,
    created_at: String,
    date_only: String,
    hour: u32,
    like_count: u64,
    retweet_count: u64,
    reply_count: u64,
    quote_count: u64,
    impression_count: u64,
}

/// `date_only` and `hour` are deliberately absent: they are re-derived
/// from `created_at` on load.
#[derive(Deserialize)]
struct SnapshotRowIn {
    #[serde(default)]
    id: Option<String>,
    created_at: String,
    like_count: u64,
    retweet_count: u64,
    reply_count: u64,
    quote_count: u64,
    #[serde(default)]
    impression_count: u64,
}

/// Reads and overwrites the dataset snapshot at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the whole snapshot with `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] or [`StoreError::Csv`] if the file cannot be
    /// written. On error the previous snapshot is left in place.
    pub fn save(&self, dataset: &PostDataset) -> Result<(), StoreError> {
        write_atomically(&self.path, |file| {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer
                .write_record(SNAPSHOT_COLUMNS)
                .map_err(|source| self.csv_err(source))?;
            for post in dataset {
                writer
                    .serialize(row_out(post))
                    .map_err(|source| self.csv_err(source))?;
            }
            writer.flush().map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
        })?;

        tracing::info!(
            path = %self.path.display(),
            rows = dataset.len(),
            "dataset snapshot saved"
        );
        Ok(())
    }

    /// Reads the snapshot back into a dataset.
    ///
    /// A missing file is an empty dataset, not an error.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file exists but cannot be opened.
    /// - [`StoreError::Csv`] if a row does not match the snapshot schema.
    /// - [`StoreError::InvalidRow`] if a `created_at` value is not a timestamp.
    pub fn load(&self) -> Result<PostDataset, StoreError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no dataset snapshot on disk");
                return Ok(PostDataset::empty());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut reader = csv::Reader::from_reader(file);
        let mut posts = Vec::new();
        for (idx, record) in reader.deserialize::<SnapshotRowIn>().enumerate() {
            let row = record.map_err(|source| self.csv_err(source))?;
            // Data rows are numbered from 1, after the header.
            posts.push(self.row_in(idx + 1, row)?);
        }

        Ok(PostDataset::new(posts))
    }

    fn row_in(&self, row_number: usize, row: SnapshotRowIn) -> Result<NormalizedPost, StoreError> {
        let created_at =
            parse_timestamp(&row.created_at).ok_or_else(|| StoreError::InvalidRow {
                path: self.path.clone(),
                row: row_number,
                reason: format!("created_at '{}' is not an ISO-8601 timestamp", row.created_at),
            })?;

        Ok(NormalizedPost::new(
            row.id.filter(|id| !id.is_empty()),
            created_at,
            PostMetrics {
                like_count: row.like_count,
                retweet_count: row.retweet_count,
                reply_count: row.reply_count,
                quote_count: row.quote_count,
                impression_count: row.impression_count,
            },
        ))
    }

    fn csv_err(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

fn row_out(post: &NormalizedPost) -> SnapshotRowOut<'_> {
    SnapshotRowOut {
        id: post.id.as_deref(),
        created_at: post
            .created_at()
            .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        date_only: post.date_only().format("%Y-%m-%d").to_string(),
        hour: post.hour(),
        like_count: post.metrics.like_count,
        retweet_count: post.metrics.retweet_count,
        reply_count: post.metrics.reply_count,
        quote_count: post.metrics.quote_count,
        impression_count: post.metrics.impression_count,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SnapshotStore {
        SnapshotStore::new(dir.path().join("someone_tweets.csv"))
    }

    #[test]
    fn header_matches_snapshot_columns() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let post = NormalizedPost::new(
            Some("1".to_string()),
            Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap(),
            PostMetrics::default(),
        );
        store.save(&PostDataset::new(vec![post])).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(SNAPSHOT_COLUMNS.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some("1,2025-02-03T04:05:06Z,2025-02-03,4,0,0,0,0,0")
        );
    }

    #[test]
    fn metric_columns_follow_metric_order() {
        let metric_columns: Vec<&str> = Metric::ALL.iter().map(|m| m.column()).collect();
        assert_eq!(&SNAPSHOT_COLUMNS[4..], metric_columns.as_slice());
    }

    #[test]
    fn empty_dataset_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&PostDataset::empty()).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.trim_end(), SNAPSHOT_COLUMNS.join(","));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn invalid_created_at_reports_row_number() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            "id,created_at,date_only,hour,like_count,retweet_count,reply_count,quote_count,impression_count\n\
             1,2025-01-01T00:00:00Z,2025-01-01,0,1,1,1,1,1\n\
             2,not-a-date,2025-01-01,0,1,1,1,1,1\n",
        )
        .unwrap();

        let err = store.load().unwrap_err();
        assert!(
            matches!(err, StoreError::InvalidRow { row: 2, .. }),
            "expected InvalidRow at row 2, got: {err:?}"
        );
    }

    #[test]
    fn non_numeric_metric_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            "id,created_at,date_only,hour,like_count,retweet_count,reply_count,quote_count,impression_count\n\
             1,2025-01-01T00:00:00Z,2025-01-01,0,many,1,1,1,1\n",
        )
        .unwrap();

        assert!(matches!(store.load(), Err(StoreError::Csv { .. })));
    }
}
