//! Paginated bucket scan that selects deletion candidates.
//!
//! The scanner drives the listing API one page at a time (cursors are
//! inherently sequential) and applies the window and prefix filters per
//! item. The continuation cursor is the only termination signal; an empty
//! page does not end the scan.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::store::{BucketStore, MAX_PAGE_SIZE, StoreError};
use crate::window::ScanWindow;

/// Cadence, in scanned objects, of progress log lines.
const PROGRESS_INTERVAL: u64 = 5000;

/// A listing failure is fatal to the whole scan; no partial candidate set
/// is trusted. The cursor pins down where the listing stopped.
#[derive(Debug, Error)]
#[error("listing failed for bucket {bucket} at cursor {cursor:?}: {source}")]
pub struct ScanError {
    pub bucket: String,
    pub cursor: Option<String>,
    #[source]
    pub source: StoreError,
}

/// An object selected for deletion. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

/// Everything a scan pass produced.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Matching objects in listing order.
    pub candidates: Vec<Candidate>,
    /// Total objects examined, matching or not.
    pub scanned: u64,
}

/// Scan the bucket's key space and collect every object whose modification
/// timestamp falls inside `window`, optionally restricted to `prefix`
/// (already normalized, see [`crate::window::normalize_prefix`]).
pub async fn scan(
    store: &dyn BucketStore,
    bucket: &str,
    window: &ScanWindow,
    prefix: Option<&str>,
) -> Result<ScanOutcome, ScanError> {
    info!(
        bucket,
        start = %window.start,
        end = %window.end,
        prefix,
        "Scanning bucket for candidates"
    );

    let mut outcome = ScanOutcome::default();
    let mut cursor: Option<String> = None;
    let mut next_progress = PROGRESS_INTERVAL;

    loop {
        let page = store
            .list_page(bucket, prefix, cursor.as_deref(), MAX_PAGE_SIZE)
            .await
            .map_err(|source| ScanError {
                bucket: bucket.to_string(),
                cursor: cursor.clone(),
                source,
            })?;

        debug!(bucket, page_len = page.objects.len(), "Processing listing page");

        for entry in page.objects {
            outcome.scanned += 1;

            // The listing API already restricts by prefix, but items are
            // checked again so the invariant holds regardless of backend.
            let prefix_ok = prefix.is_none_or(|p| entry.key.starts_with(p));

            // Objects without a parseable timestamp can never match.
            if prefix_ok
                && let Some(last_modified) = entry.last_modified
                && window.contains(last_modified)
            {
                outcome.candidates.push(Candidate {
                    key: entry.key,
                    last_modified,
                });
            }

            if outcome.scanned >= next_progress {
                info!(
                    scanned = outcome.scanned,
                    matched = outcome.candidates.len(),
                    "Scan progress"
                );
                next_progress += PROGRESS_INTERVAL;
            }
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    info!(
        scanned = outcome.scanned,
        matched = outcome.candidates.len(),
        "Scan complete"
    );

    Ok(outcome)
}
