//! Per-bucket and per-folder totals for a candidates or deletions CSV.
//!
//! Reads a CSV with the export schema (`s3_uri,uploaded_at`) and writes a
//! timestamped summary: one `s3://<bucket-or-folder>: N objects` line per
//! bucket, then per folder prefix at every directory depth. Malformed rows
//! are skipped, not fatal.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::stamp::RunStamp;
use crate::store::parse_object_uri;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV not found: {0}")]
    NotFound(PathBuf),

    #[error("CSV appears empty or missing data rows: {0}")]
    Empty(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Object counts keyed by bucket and by `bucket/folder` prefix.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UsageTotals {
    pub bucket_totals: BTreeMap<String, u64>,
    pub folder_totals: BTreeMap<String, u64>,
}

/// Tally one CSV export.
pub fn tally_csv(input: &Path) -> Result<UsageTotals, ReportError> {
    if !input.exists() {
        return Err(ReportError::NotFound(input.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(input)?;
    let mut totals = UsageTotals::default();
    let mut rows = 0u64;

    for record in reader.records() {
        let record = record?;
        rows += 1;

        let Some(raw_uri) = record.get(0) else {
            continue;
        };
        let uri = raw_uri.trim().trim_matches('"');
        let Some((bucket, key)) = parse_object_uri(uri) else {
            warn!(uri, "Skipping row with unrecognized object URI");
            continue;
        };

        *totals.bucket_totals.entry(bucket.to_string()).or_default() += 1;

        // Credit every directory level containing this object. A key
        // ending in `/` is itself a directory; otherwise the last segment
        // is a file and only its ancestors count.
        let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
        let dir_count = if key.ends_with('/') {
            segments.len()
        } else {
            segments.len().saturating_sub(1)
        };

        let mut prefix = String::new();
        for segment in &segments[..dir_count] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            *totals
                .folder_totals
                .entry(format!("{bucket}/{prefix}"))
                .or_default() += 1;
        }
    }

    if rows == 0 {
        return Err(ReportError::Empty(input.to_path_buf()));
    }

    Ok(totals)
}

/// Write the summary file and return its path.
pub fn write_summary(
    output_dir: &Path,
    stamp: RunStamp,
    totals: &UsageTotals,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("summary-{}.txt", stamp.tag()));

    let mut out = String::new();
    for (bucket, count) in &totals.bucket_totals {
        out.push_str(&format!("s3://{bucket}: {count} objects\n"));
    }
    for (folder, count) in &totals.folder_totals {
        out.push_str(&format!("s3://{folder}: {count} objects\n"));
    }

    fs::write(&path, out)?;
    Ok(path)
}
