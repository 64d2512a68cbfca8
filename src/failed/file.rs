//! Failure records kept as a JSON array in a single file.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::query::FailedJobQuery;
use super::record::{FailureRecord, JobId};
use super::store::{FailedJobStore, QueryableFailedJobStore, StoreError};

/// File-backed store. Queryable: the whole file is small enough to filter in
/// memory. A missing file is an empty store.
///
/// Assumes a single writer process. `forget` is a read-modify-write of the
/// whole file guarded by an in-process lock only, so another process
/// rewriting the same file concurrently can lose records.
pub struct FileFailedJobStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileFailedJobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<FailureRecord>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, records: &[FailureRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension(format!("json.{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, serde_json::to_vec_pretty(records)?).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl FailedJobStore for FileFailedJobStore {
    async fn find(&self, id: &JobId) -> Result<Option<FailureRecord>, StoreError> {
        Ok(self.load().await?.into_iter().find(|r| &r.id == id))
    }

    async fn forget(&self, id: &JobId) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records).await?;
        Ok(true)
    }

    async fn all(&self) -> Result<Vec<FailureRecord>, StoreError> {
        self.load().await
    }

    fn as_queryable(&self) -> Option<&dyn QueryableFailedJobStore> {
        Some(self)
    }
}

#[async_trait]
impl QueryableFailedJobStore for FileFailedJobStore {
    async fn select_ids(&self, query: &FailedJobQuery) -> Result<Vec<JobId>, StoreError> {
        let records = self.load().await?;
        Ok(query.apply(&records))
    }
}
