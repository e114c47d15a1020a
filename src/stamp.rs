//! Run-scoped timestamp shared by every artifact a run produces.

use chrono::{DateTime, SecondsFormat, Utc};

/// A single wall-clock instant tagging all artifacts of one run, so the
/// preview, CSV export, and audit log can be correlated after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStamp(DateTime<Utc>);

impl RunStamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// RFC 3339 with millisecond precision, for artifact headers.
    pub fn iso(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Filename-safe variant: `:` and `.` replaced with `-`.
    pub fn tag(&self) -> String {
        self.iso().replace([':', '.'], "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_filename_safe() {
        let stamp = RunStamp::at(
            DateTime::parse_from_rfc3339("2025-12-20T15:11:18.159Z")
                .unwrap()
                .with_timezone(&Utc),
        );
        assert_eq!(stamp.iso(), "2025-12-20T15:11:18.159Z");
        assert_eq!(stamp.tag(), "2025-12-20T15-11-18-159Z");
    }
}
