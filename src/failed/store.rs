use async_trait::async_trait;
use thiserror::Error;

use super::query::FailedJobQuery;
use super::record::{FailureRecord, JobId};

/// Errors raised by a failed-job store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed-job store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed-job store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage of failure records, as seen by the retry command.
///
/// Every backend can enumerate, look up and forget records. Backends that can
/// filter, page and order on their own expose that through
/// [`as_queryable`](FailedJobStore::as_queryable); callers check for it and
/// fall back to [`all`](FailedJobStore::all) when it is absent.
#[async_trait]
pub trait FailedJobStore: Send + Sync {
    async fn find(&self, id: &JobId) -> Result<Option<FailureRecord>, StoreError>;

    /// Deletes the record. Returns whether a record was removed; forgetting an
    /// absent id is not an error.
    async fn forget(&self, id: &JobId) -> Result<bool, StoreError>;

    /// Every record, in the backend's native order.
    async fn all(&self) -> Result<Vec<FailureRecord>, StoreError>;

    /// Query capability of this backend, if it has one.
    fn as_queryable(&self) -> Option<&dyn QueryableFailedJobStore> {
        None
    }
}

/// Backends that can evaluate a [`FailedJobQuery`] themselves.
#[async_trait]
pub trait QueryableFailedJobStore: Send + Sync {
    async fn select_ids(&self, query: &FailedJobQuery) -> Result<Vec<JobId>, StoreError>;
}
