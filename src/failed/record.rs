use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a failure record.
///
/// Opaque to the retry logic. Ids that look like unsigned integers compare
/// numerically so database-style ids sort as `2 < 10`; anything else
/// compares lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for JobId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for JobId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A job that exhausted its attempts, as persisted by the failed-job store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub id: JobId,
    /// Name of the queue connection the job originally ran on.
    pub connection: String,
    pub queue: String,
    /// Serialized job, exactly as it was handed to the queue.
    pub payload: String,
    /// Error text captured when the job failed.
    #[serde(default)]
    pub exception: String,
    pub failed_at: DateTime<Utc>,
}

impl FailureRecord {
    #[cfg(test)]
    pub fn new(
        id: impl Into<JobId>,
        connection: impl Into<String>,
        queue: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            connection: connection.into(),
            queue: queue.into(),
            payload: payload.into(),
            exception: String::new(),
            failed_at: Utc::now(),
        }
    }
}
