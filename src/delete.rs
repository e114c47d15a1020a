//! Chunked batch deletion with per-key failure accounting.
//!
//! Candidates are consumed strictly in scanner order, one batch call in
//! flight at a time, so the audit log stays monotonic with respect to the
//! store's confirmations: after a crash it reflects a prefix of attempted
//! chunks, never an interleaving.

use std::collections::HashMap;

use tracing::{error, info, warn};

use crate::audit::AuditLog;
use crate::scan::Candidate;
use crate::store::{BucketStore, object_uri};

/// Totals for the destructive phase of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteTotals {
    /// Keys the store confirmed deleted.
    pub deleted: u64,
    /// Keys that failed, per-key or as part of a failed chunk call.
    pub errors: u64,
}

/// Delete every candidate in order, in chunks of at most the store's batch
/// ceiling.
///
/// A transport-level failure of a chunk call counts the whole chunk as
/// errored and the run continues with the next chunk; per-key errors inside
/// a successful call are counted and logged. Only confirmed keys reach the
/// audit log, each with the timestamp the scanner recorded for it.
pub async fn delete_all(
    store: &dyn BucketStore,
    bucket: &str,
    candidates: &[Candidate],
    audit: &mut AuditLog,
) -> std::io::Result<DeleteTotals> {
    let mut totals = DeleteTotals::default();
    let chunk_size = store.max_batch_size();
    let chunk_count = candidates.len().div_ceil(chunk_size);

    for (index, chunk) in candidates.chunks(chunk_size).enumerate() {
        info!(
            chunk = index + 1,
            chunks = chunk_count,
            keys = chunk.len(),
            "Deleting batch"
        );

        let keys: Vec<String> = chunk.iter().map(|c| c.key.clone()).collect();
        let outcome = match store.delete_batch(bucket, &keys).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    chunk = index + 1,
                    keys = chunk.len(),
                    error = %e,
                    "Batch delete call failed; counting whole chunk as errored"
                );
                totals.errors += chunk.len() as u64;
                continue;
            }
        };

        for failure in &outcome.failed {
            warn!(
                key = %failure.key,
                code = failure.code.as_deref(),
                message = failure.message.as_deref(),
                "Store reported delete failure"
            );
        }
        totals.errors += outcome.failed.len() as u64;
        totals.deleted += outcome.deleted.len() as u64;

        // Timestamps come from the scan, never re-fetched from the store.
        let recorded: HashMap<&str, _> = chunk
            .iter()
            .map(|c| (c.key.as_str(), c.last_modified))
            .collect();
        for key in &outcome.deleted {
            if let Some(last_modified) = recorded.get(key.as_str()) {
                audit.append(*last_modified, &object_uri(bucket, key))?;
            }
        }
        audit.flush()?;
    }

    Ok(totals)
}
