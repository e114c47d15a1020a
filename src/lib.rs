//! scour — time-windowed bulk deletion for S3 buckets.
//!
//! Scans a bucket's entire key space page by page, selects objects whose
//! modification timestamp falls in an operator-supplied inclusive window
//! (optionally under a key prefix), writes preview artifacts, gates the
//! destructive step behind explicit confirmation, then deletes the
//! selection in capped batches while keeping an append-only audit log of
//! what the store actually confirmed deleted.
//!
//! The pipeline issues at most one network call at a time: listing cursors
//! are inherently sequential, and sequential delete chunks keep the audit
//! log a clean prefix of attempted work after a crash.

pub mod audit;
pub mod confirm;
pub mod delete;
pub mod error;
pub mod pipeline;
pub mod preview;
pub mod report;
pub mod scan;
pub mod stamp;
pub mod store;
pub mod summary;
pub mod window;
