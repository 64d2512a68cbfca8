//! In-memory stores for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::query::FailedJobQuery;
use super::record::{FailureRecord, JobId};
use super::store::{FailedJobStore, QueryableFailedJobStore, StoreError};

/// Queryable store over a vector, keeping insertion order as native order.
#[derive(Debug, Default)]
pub struct InMemoryFailedJobStore {
    records: Mutex<Vec<FailureRecord>>,
    queries: Mutex<Vec<FailedJobQuery>>,
}

impl InMemoryFailedJobStore {
    pub fn with_records(records: Vec<FailureRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries this store has executed, oldest first.
    pub fn queries(&self) -> Vec<FailedJobQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl FailedJobStore for InMemoryFailedJobStore {
    async fn find(&self, id: &JobId) -> Result<Option<FailureRecord>, StoreError> {
        Ok(self.records.lock().unwrap().iter().find(|r| &r.id == id).cloned())
    }

    async fn forget(&self, id: &JobId) -> Result<bool, StoreError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| &r.id != id);
        Ok(records.len() != before)
    }

    async fn all(&self) -> Result<Vec<FailureRecord>, StoreError> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn as_queryable(&self) -> Option<&dyn QueryableFailedJobStore> {
        Some(self)
    }
}

#[async_trait]
impl QueryableFailedJobStore for InMemoryFailedJobStore {
    async fn select_ids(&self, query: &FailedJobQuery) -> Result<Vec<JobId>, StoreError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(query.apply(self.records.lock().unwrap().iter()))
    }
}

/// Same records, without the query capability.
#[derive(Debug, Default)]
pub struct SimpleFailedJobStore(pub InMemoryFailedJobStore);

#[async_trait]
impl FailedJobStore for SimpleFailedJobStore {
    async fn find(&self, id: &JobId) -> Result<Option<FailureRecord>, StoreError> {
        self.0.find(id).await
    }

    async fn forget(&self, id: &JobId) -> Result<bool, StoreError> {
        self.0.forget(id).await
    }

    async fn all(&self) -> Result<Vec<FailureRecord>, StoreError> {
        self.0.all().await
    }
}

fn refused() -> StoreError {
    StoreError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

/// Store whose every call fails, standing in for an unreachable backend.
#[derive(Debug, Default)]
pub struct UnreachableFailedJobStore;

#[async_trait]
impl FailedJobStore for UnreachableFailedJobStore {
    async fn find(&self, _id: &JobId) -> Result<Option<FailureRecord>, StoreError> {
        Err(refused())
    }

    async fn forget(&self, _id: &JobId) -> Result<bool, StoreError> {
        Err(refused())
    }

    async fn all(&self) -> Result<Vec<FailureRecord>, StoreError> {
        Err(refused())
    }
}
