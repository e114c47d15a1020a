//! The purge pipeline: scan, preview, gate, delete, summarize.
//!
//! One configurable flow replaces what would otherwise be near-identical
//! dry-run / prefixed / unprefixed variants: `dry_run` stops the run after
//! the preview, `prefix` narrows the scan. The store client and confirmer
//! are injected so the whole flow is testable end to end.

use std::path::PathBuf;

use tracing::info;

use crate::audit::AuditLog;
use crate::confirm::Confirmer;
use crate::delete::delete_all;
use crate::error::PurgeError;
use crate::preview::record_preview;
use crate::scan::scan;
use crate::stamp::RunStamp;
use crate::store::BucketStore;
use crate::summary::RunSummary;
use crate::window::ScanWindow;

/// Inputs for one purge run. `prefix` must already be normalized (see
/// [`crate::window::normalize_prefix`]).
#[derive(Debug, Clone)]
pub struct PurgeRequest {
    pub bucket: String,
    pub window: ScanWindow,
    pub prefix: Option<String>,
    pub dry_run: bool,
    pub output_dir: PathBuf,
}

/// Run the full pipeline and return the final totals.
///
/// Order is load-bearing: the preview artifacts are fully written before
/// the confirmation gate, and the gate runs before any delete call. In a
/// dry run the gate and the delete phase are never reached.
pub async fn run_purge(
    store: &dyn BucketStore,
    confirmer: &dyn Confirmer,
    request: &PurgeRequest,
) -> Result<RunSummary, PurgeError> {
    let stamp = RunStamp::now();

    let outcome = scan(
        store,
        &request.bucket,
        &request.window,
        request.prefix.as_deref(),
    )
    .await?;

    let mut summary = RunSummary {
        scanned: outcome.scanned,
        matched: outcome.candidates.len() as u64,
        dry_run: request.dry_run,
        ..Default::default()
    };

    if outcome.candidates.is_empty() {
        info!("No objects matched the window; nothing to do");
        return Ok(summary);
    }

    let artifacts = record_preview(
        &request.output_dir,
        stamp,
        &request.bucket,
        request.prefix.as_deref(),
        &request.window,
        &outcome.candidates,
    )?;

    if request.dry_run {
        info!(
            candidates = outcome.candidates.len(),
            "Dry run: would delete the previewed objects"
        );
        summary.deleted = summary.matched;
        return Ok(summary);
    }

    let prompt = format!(
        "About to delete {} objects from {} (preview: {}). Type \"yes\" to continue:",
        outcome.candidates.len(),
        request.bucket,
        artifacts.text_path.display()
    );
    if !confirmer.confirm(&prompt)? {
        info!("Deletion declined by operator");
        return Ok(summary);
    }

    let mut audit = AuditLog::create(&request.output_dir, stamp, &request.bucket)?;
    let totals = delete_all(store, &request.bucket, &outcome.candidates, &mut audit).await?;
    audit.flush()?;

    summary.deleted = totals.deleted;
    summary.errors = totals.errors;

    info!(
        deleted = totals.deleted,
        errors = totals.errors,
        audit = %audit.path().display(),
        "Deletion complete"
    );

    Ok(summary)
}
