use std::sync::Arc;

use futures::Stream;
use futures::stream;
use serde::Serialize;

use crate::failed::{FailedJobStore, FailureRecord, JobId, StoreError};
use crate::payload::reset_attempts;
use crate::queue::QueueManager;
use crate::resolver::{JobIdResolver, SelectionCriteria};

/// How retrying one failed job ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum RetryStatus {
    /// Pushed back onto its queue and removed from the failed-job store.
    Succeeded,
    /// No failure record with this id.
    NotFound,
    /// The stored payload is not valid JSON. The record is kept.
    PayloadDecodeError(String),
    /// The queue refused the job. The record is kept.
    EnqueueError(String),
    /// The store failed while looking the record up.
    LookupError(String),
}

/// Result of retrying a single id. Produced once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetryOutcome {
    pub id: JobId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(flatten)]
    pub status: RetryStatus,
}

impl RetryOutcome {
    fn missing(id: JobId, status: RetryStatus) -> Self {
        Self {
            id,
            connection: None,
            queue: None,
            status,
        }
    }

    fn for_record(record: FailureRecord, status: RetryStatus) -> Self {
        Self {
            id: record.id,
            connection: Some(record.connection),
            queue: Some(record.queue),
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RetryStatus::Succeeded
    }
}

/// Pushes failed jobs back onto their original queue and connection.
///
/// Ids are processed one at a time, in resolution order. A record is only
/// forgotten after its payload was accepted by the queue, so a failure at any
/// step leaves it in place for the next run.
pub struct RetryOrchestrator {
    store: Arc<dyn FailedJobStore>,
    queue: Arc<QueueManager>,
}

impl RetryOrchestrator {
    pub fn new(store: Arc<dyn FailedJobStore>, queue: Arc<QueueManager>) -> Self {
        Self { store, queue }
    }

    /// Resolves `criteria` and returns a lazy stream of per-id outcomes.
    ///
    /// Resolution happens up front: if the store cannot be read, the error is
    /// returned before any job is touched. Each poll of the stream retries
    /// exactly one id, so dropping the stream early leaves the remaining ids
    /// untouched.
    pub async fn run(
        &self,
        criteria: SelectionCriteria,
    ) -> Result<impl Stream<Item = RetryOutcome> + '_, StoreError> {
        let ids = JobIdResolver::new(self.store.as_ref())
            .resolve(&criteria)
            .await?;
        tracing::info!(count = ids.len(), "retrying failed jobs");

        Ok(stream::unfold(ids.into_iter(), move |mut ids| async move {
            let id = ids.next()?;
            Some((self.retry(id).await, ids))
        }))
    }

    /// Failure records the selection would retry, without side effects.
    /// Ids with no record are skipped.
    pub async fn preview(
        &self,
        criteria: &SelectionCriteria,
    ) -> Result<Vec<FailureRecord>, StoreError> {
        let ids = JobIdResolver::new(self.store.as_ref())
            .resolve(criteria)
            .await?;
        let mut records = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(record) = self.store.find(id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn retry(&self, id: JobId) -> RetryOutcome {
        let record = match self.store.find(&id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!(%id, "failed job not found");
                return RetryOutcome::missing(id, RetryStatus::NotFound);
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "could not look up failed job");
                return RetryOutcome::missing(id, RetryStatus::LookupError(e.to_string()));
            }
        };

        let payload = match reset_attempts(&record.payload) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(%id, error = %e, "failed job has an unreadable payload");
                let status = RetryStatus::PayloadDecodeError(e.to_string());
                return RetryOutcome::for_record(record, status);
            }
        };

        if let Err(e) = self
            .queue
            .enqueue_raw(&record.connection, &record.queue, &payload)
            .await
        {
            tracing::warn!(
                %id,
                connection = %record.connection,
                queue = %record.queue,
                error = %e,
                "failed to push job back onto the queue"
            );
            return RetryOutcome::for_record(record, RetryStatus::EnqueueError(e.to_string()));
        }

        // The job is queued again; a record left behind here only means it
        // may be retried twice.
        if let Err(e) = self.store.forget(&id).await {
            tracing::warn!(
                %id,
                error = %e,
                "job re-queued but its failure record was not removed"
            );
        }

        tracing::info!(
            %id,
            connection = %record.connection,
            queue = %record.queue,
            "failed job pushed back onto the queue"
        );
        RetryOutcome::for_record(record, RetryStatus::Succeeded)
    }
}
