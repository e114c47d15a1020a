//! Time-window and prefix selection rules.
//!
//! Operators reason about deletion windows in whole days, so a bare
//! calendar date is interpreted asymmetrically: as a start bound it means
//! midnight, as an end bound it means the end of that day (23:59:59.999).
//! Full RFC 3339 timestamps are always taken literally.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

/// Errors from window construction. These are configuration errors and
/// abort the run before any network call.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("unrecognized timestamp {0:?} (expected YYYY-MM-DD or RFC 3339)")]
    Unparsable(String),

    #[error("window start {start} is after window end {end}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Which end of the window a bound string is filling in.
///
/// Only matters for bare calendar dates, which expand to midnight at the
/// start of the window and end-of-day at the end of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Inclusive selection window over object modification timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScanWindow {
    /// Build a window from already-parsed bounds, rejecting inverted ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if end < start {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse operator-supplied bound strings (date-only or RFC 3339) into
    /// a validated window.
    pub fn parse(start: &str, end: &str) -> Result<Self, WindowError> {
        let start = parse_bound(start, Bound::Start)?;
        let end = parse_bound(end, Bound::End)?;
        Self::new(start, end)
    }

    /// The core selection predicate: inclusive on both ends.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Parse one window bound.
///
/// Accepts `YYYY-MM-DD` (expanded per [`Bound`]), RFC 3339, or a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp treated as UTC.
pub fn parse_bound(raw: &str, bound: Bound) -> Result<DateTime<Utc>, WindowError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            Bound::End => end_of_day(),
        };
        return Ok(date.and_time(time).and_utc());
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    Err(WindowError::Unparsable(raw.to_string()))
}

fn end_of_day() -> NaiveTime {
    // 23:59:59.999 is always a valid wall-clock time.
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// Normalize a key prefix so it only matches whole path segments: forward
/// slashes throughout and a trailing separator. Returns `None` when the
/// input is empty after normalization (no prefix restriction).
pub fn normalize_prefix(raw: &str) -> Option<String> {
    let cleaned = raw.trim().replace('\\', "/");
    let trimmed = cleaned.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("{trimmed}/"))
}
