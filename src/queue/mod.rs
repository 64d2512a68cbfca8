pub mod error;
pub mod http;
pub mod spool;

use std::collections::HashMap;

use async_trait::async_trait;

pub use error::QueueError;
pub use http::HttpConnection;
pub use spool::SpoolConnection;

/// A single named queue connection.
#[async_trait]
pub trait QueueConnection: Send + Sync {
    /// Submits an already-serialized job without re-encoding it.
    async fn push_raw(&self, queue: &str, payload: &str) -> Result<(), QueueError>;

    /// Queue used when a job does not name one.
    fn default_queue(&self) -> &str;
}

/// Routes raw pushes to connections by name.
#[derive(Default)]
pub struct QueueManager {
    connections: HashMap<String, Box<dyn QueueConnection>>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connection(
        mut self,
        name: impl Into<String>,
        connection: impl QueueConnection + 'static,
    ) -> Self {
        self.connections.insert(name.into(), Box::new(connection));
        self
    }

    pub fn connection_names(&self) -> impl Iterator<Item = &str> {
        self.connections.keys().map(String::as_str)
    }

    /// Pushes `payload` onto `queue` of the named connection. An empty queue
    /// name selects the connection's default queue.
    pub async fn enqueue_raw(
        &self,
        connection: &str,
        queue: &str,
        payload: &str,
    ) -> Result<(), QueueError> {
        let conn = self
            .connections
            .get(connection)
            .ok_or_else(|| QueueError::UnknownConnection(connection.to_string()))?;
        let queue = if queue.is_empty() {
            conn.default_queue()
        } else {
            queue
        };
        conn.push_raw(queue, payload).await
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FailingConnection, RecordingConnection};
    use super::*;

    #[tokio::test]
    async fn routes_to_named_connection() {
        let redis = RecordingConnection::default();
        let sqs = RecordingConnection::default();
        let manager = QueueManager::new()
            .with_connection("redis", redis.clone())
            .with_connection("sqs", sqs.clone());

        manager.enqueue_raw("sqs", "emails", "{}").await.unwrap();

        assert!(redis.pushed().is_empty());
        assert_eq!(sqs.pushed(), vec![("emails".to_string(), "{}".to_string())]);
    }

    #[tokio::test]
    async fn empty_queue_uses_connection_default() {
        let redis = RecordingConnection::default();
        let manager = QueueManager::new().with_connection("redis", redis.clone());

        manager.enqueue_raw("redis", "", "{}").await.unwrap();

        assert_eq!(redis.pushed()[0].0, "default");
    }

    #[tokio::test]
    async fn unknown_connection_is_an_error() {
        let manager = QueueManager::new().with_connection("redis", RecordingConnection::default());
        let err = manager.enqueue_raw("sqs", "default", "{}").await.unwrap_err();
        assert!(matches!(err, QueueError::UnknownConnection(name) if name == "sqs"));
    }

    #[tokio::test]
    async fn connection_errors_propagate() {
        let manager = QueueManager::new().with_connection("redis", FailingConnection);
        let err = manager.enqueue_raw("redis", "default", "{}").await.unwrap_err();
        assert!(matches!(err, QueueError::Rejected { status: 500, .. }));
    }
}
