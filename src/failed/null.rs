use async_trait::async_trait;

use super::record::{FailureRecord, JobId};
use super::store::{FailedJobStore, StoreError};

/// Store used when failed jobs are not being recorded. Always empty.
#[derive(Debug, Default)]
pub struct NullFailedJobStore;

#[async_trait]
impl FailedJobStore for NullFailedJobStore {
    async fn find(&self, _id: &JobId) -> Result<Option<FailureRecord>, StoreError> {
        Ok(None)
    }

    async fn forget(&self, _id: &JobId) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn all(&self) -> Result<Vec<FailureRecord>, StoreError> {
        Ok(Vec::new())
    }
}
