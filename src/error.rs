//! Error taxonomy for the purge pipeline.
//!
//! Configuration and scan errors abort the run before or during the
//! non-destructive phase. Delete-phase per-key and chunk-level failures
//! are counts in the summary, not errors, so the run can continue past
//! them (see `delete`).

use thiserror::Error;

use crate::scan::ScanError;
use crate::window::WindowError;

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("configuration error: {0}")]
    Config(#[from] WindowError),

    #[error("scan aborted: {0}")]
    Scan(#[from] ScanError),

    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
}
