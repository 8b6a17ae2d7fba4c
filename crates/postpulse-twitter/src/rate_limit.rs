//! Rate-limit header interpretation for the X/Twitter v2 API.
//!
//! The API reports its window in `x-rate-limit-*` response headers. This
//! module only reads them: deciding whether to wait, retry, or fall back is
//! left to the caller.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;

pub const RESET_HEADER: &str = "x-rate-limit-reset";
pub const REMAINING_HEADER: &str = "x-rate-limit-remaining";
pub const LIMIT_HEADER: &str = "x-rate-limit-limit";

/// When the current rate-limit window ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSignal {
    /// Seconds until `reset_at`, never negative.
    pub wait_seconds: u64,
    pub reset_at: DateTime<Utc>,
}

impl std::fmt::Display for RateLimitSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "reset at {}, wait {}s",
            self.reset_at, self.wait_seconds
        )
    }
}

/// Reads `x-rate-limit-reset` (an epoch-seconds integer) into a signal.
///
/// Returns `None` when the header is missing, not UTF-8, not an integer, or
/// outside the representable timestamp range. A reset time in the past
/// yields `wait_seconds = 0`.
#[must_use]
pub fn interpret(headers: &HeaderMap, now: DateTime<Utc>) -> Option<RateLimitSignal> {
    let reset_epoch = header_i64(headers, RESET_HEADER)?;
    let reset_at = DateTime::<Utc>::from_timestamp(reset_epoch, 0)?;
    let wait_seconds = reset_epoch
        .saturating_sub(now.timestamp())
        .max(0)
        .unsigned_abs();
    Some(RateLimitSignal {
        wait_seconds,
        reset_at,
    })
}

/// Request budget for the current window, when the API reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitQuota {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
}

impl RateLimitQuota {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let parse = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
        };
        Self {
            limit: parse(LIMIT_HEADER),
            remaining: parse(REMAINING_HEADER),
        }
    }
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn future_reset_yields_remaining_wait() {
        let now = fixed_now();
        let reset = now.timestamp() + 120;
        let headers = headers_with(RESET_HEADER, &reset.to_string());

        let signal = interpret(&headers, now).expect("signal should be present");
        assert_eq!(signal.wait_seconds, 120);
        assert_eq!(signal.reset_at, Utc.with_ymd_and_hms(2025, 1, 1, 12, 2, 0).unwrap());
    }

    #[test]
    fn past_reset_clamps_wait_to_zero() {
        let now = fixed_now();
        let reset = now.timestamp() - 3_600;
        let headers = headers_with(RESET_HEADER, &reset.to_string());

        let signal = interpret(&headers, now).expect("signal should be present");
        assert_eq!(signal.wait_seconds, 0);
        assert!(signal.reset_at < now);
    }

    #[test]
    fn missing_header_is_absent() {
        assert_eq!(interpret(&HeaderMap::new(), fixed_now()), None);
    }

    #[test]
    fn non_numeric_header_is_absent() {
        let headers = headers_with(RESET_HEADER, "soon");
        assert_eq!(interpret(&headers, fixed_now()), None);
    }

    #[test]
    fn fractional_header_is_absent() {
        let headers = headers_with(RESET_HEADER, "1735732920.5");
        assert_eq!(interpret(&headers, fixed_now()), None);
    }

    #[test]
    fn out_of_range_epoch_is_absent() {
        let headers = headers_with(RESET_HEADER, &i64::MAX.to_string());
        assert_eq!(interpret(&headers, fixed_now()), None);
    }

    #[test]
    fn quota_reads_limit_and_remaining() {
        let mut headers = headers_with(LIMIT_HEADER, "1500");
        headers.insert(REMAINING_HEADER, HeaderValue::from_static("0"));
        let quota = RateLimitQuota::from_headers(&headers);
        assert_eq!(quota.limit, Some(1500));
        assert_eq!(quota.remaining, Some(0));
    }

    #[test]
    fn quota_tolerates_missing_headers() {
        assert_eq!(
            RateLimitQuota::from_headers(&HeaderMap::new()),
            RateLimitQuota::default()
        );
    }
}
