//! Object-store client abstraction consumed by the scan and delete phases.
//!
//! The pipeline never talks to a concrete SDK directly; it is handed a
//! [`BucketStore`] built in `main`. This keeps the destructive phases
//! testable against a programmed in-memory store and avoids any ambient
//! client or credential state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod s3;

#[cfg(test)]
pub mod mock;

pub use s3::{S3Store, S3StoreConfig};

/// Hard ceiling on keys per batch-delete call. This is the DeleteObjects
/// protocol limit, not a tunable.
pub const MAX_DELETE_BATCH: usize = 1000;

/// Largest page a single listing call can return.
pub const MAX_PAGE_SIZE: i32 = 1000;

/// Errors from the store client.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("S3 request failed: {0}")]
    Api(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One object as reported by a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub key: String,
    /// `None` when the store reported no timestamp or one that failed to
    /// parse. Such objects can never match a window.
    pub last_modified: Option<DateTime<Utc>>,
}

/// One page of a cursor-driven listing.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    pub objects: Vec<ObjectEntry>,
    /// Cursor for the next page; `None` means the listing is exhausted.
    /// The cursor is the only termination signal, a page may be empty.
    pub next_cursor: Option<String>,
}

/// Per-key failure reported inside an otherwise-successful batch delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDelete {
    pub key: String,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Reconciled outcome of a single batch-delete call. Every submitted key
/// appears in exactly one of the two lists.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDelete>,
}

/// Capability the pipeline needs from an object store.
///
/// Implementations must be `Send + Sync` to support async contexts.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Fetch one listing page, resuming from `cursor` when given.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: Option<&str>,
        cursor: Option<&str>,
        page_size: i32,
    ) -> StoreResult<ObjectPage>;

    /// Issue one batch-delete call for `keys`. The caller guarantees
    /// `keys.len() <= max_batch_size()`.
    async fn delete_batch(&self, bucket: &str, keys: &[String]) -> StoreResult<BatchOutcome>;

    /// Maximum keys accepted by one `delete_batch` call.
    fn max_batch_size(&self) -> usize {
        MAX_DELETE_BATCH
    }
}

/// Render the canonical `s3://<bucket>/<key>` object URI.
pub fn object_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

/// Split an `s3://bucket/key` URI into bucket and key. The key may be
/// empty (bare bucket URI). Returns `None` for anything else.
pub fn parse_object_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("s3://")?;
    match rest.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() => Some((bucket, key)),
        None if !rest.is_empty() => Some((rest, "")),
        _ => None,
    }
}
