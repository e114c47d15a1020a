//! Programmable in-memory store for scanner, deleter, and pipeline tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    BatchOutcome, BucketStore, FailedDelete, ObjectPage, StoreError, StoreResult,
    MAX_DELETE_BATCH,
};

/// Scripted response for one `delete_batch` call, consumed in order.
/// Calls beyond the script succeed completely.
pub enum ScriptedDelete {
    /// Every submitted key is confirmed deleted.
    Succeed,
    /// The named keys error; the rest are confirmed deleted.
    FailKeys(Vec<String>),
    /// The whole call fails at transport level.
    Transport(String),
}

/// A listing request as observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub prefix: Option<String>,
    pub cursor: Option<String>,
    pub page_size: i32,
}

pub struct MockStore {
    pages: Mutex<Vec<ObjectPage>>,
    deletes: Mutex<Vec<ScriptedDelete>>,
    list_requests: Mutex<Vec<ListRequest>>,
    delete_calls: Mutex<Vec<Vec<String>>>,
    fail_listing_at: Option<usize>,
    batch_limit: usize,
}

impl MockStore {
    /// A store that serves `pages` front to back and deletes successfully.
    pub fn new(pages: Vec<ObjectPage>) -> Self {
        Self {
            pages: Mutex::new(pages),
            deletes: Mutex::new(Vec::new()),
            list_requests: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
            fail_listing_at: None,
            batch_limit: MAX_DELETE_BATCH,
        }
    }

    /// Script the outcomes of successive delete calls.
    pub fn with_deletes(mut self, deletes: Vec<ScriptedDelete>) -> Self {
        self.deletes = Mutex::new(deletes);
        self
    }

    /// Fail the listing call with the given zero-based index.
    pub fn failing_listing_at(mut self, index: usize) -> Self {
        self.fail_listing_at = Some(index);
        self
    }

    /// Override the advertised batch ceiling (for small chunking tests).
    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit;
        self
    }

    /// Listing requests observed so far.
    pub fn list_requests(&self) -> Vec<ListRequest> {
        self.list_requests.lock().unwrap().clone()
    }

    /// Key lists of every delete call issued so far.
    pub fn delete_calls(&self) -> Vec<Vec<String>> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BucketStore for MockStore {
    async fn list_page(
        &self,
        _bucket: &str,
        prefix: Option<&str>,
        cursor: Option<&str>,
        page_size: i32,
    ) -> StoreResult<ObjectPage> {
        let mut requests = self.list_requests.lock().unwrap();
        let index = requests.len();
        requests.push(ListRequest {
            prefix: prefix.map(str::to_string),
            cursor: cursor.map(str::to_string),
            page_size,
        });
        drop(requests);

        if self.fail_listing_at == Some(index) {
            return Err(StoreError::Api("injected listing failure".to_string()));
        }

        let mut pages = self.pages.lock().unwrap();
        if pages.is_empty() {
            return Ok(ObjectPage::default());
        }
        Ok(pages.remove(0))
    }

    async fn delete_batch(&self, _bucket: &str, keys: &[String]) -> StoreResult<BatchOutcome> {
        self.delete_calls.lock().unwrap().push(keys.to_vec());

        let script = {
            let mut deletes = self.deletes.lock().unwrap();
            if deletes.is_empty() {
                ScriptedDelete::Succeed
            } else {
                deletes.remove(0)
            }
        };

        match script {
            ScriptedDelete::Succeed => Ok(BatchOutcome {
                deleted: keys.to_vec(),
                failed: Vec::new(),
            }),
            ScriptedDelete::FailKeys(failing) => {
                let failing: HashSet<&str> = failing.iter().map(String::as_str).collect();
                let mut outcome = BatchOutcome::default();
                for key in keys {
                    if failing.contains(key.as_str()) {
                        outcome.failed.push(FailedDelete {
                            key: key.clone(),
                            code: Some("InternalError".to_string()),
                            message: Some("injected per-key failure".to_string()),
                        });
                    } else {
                        outcome.deleted.push(key.clone());
                    }
                }
                Ok(outcome)
            }
            ScriptedDelete::Transport(message) => Err(StoreError::Api(message)),
        }
    }

    fn max_batch_size(&self) -> usize {
        self.batch_limit
    }
}
