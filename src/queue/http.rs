use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::QueueConnection;
use super::error::QueueError;

/// Queue connection backed by an HTTP ingestion endpoint.
///
/// Jobs are posted to `{base_url}/queues/{queue}/jobs` with the serialized
/// payload as the request body. The queue name is always a single
/// percent-encoded path segment.
pub struct HttpConnection {
    client: Client,
    base_url: Url,
    token: Option<String>,
    default_queue: String,
}

impl HttpConnection {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        default_queue: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, QueueError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        let invalid = |reason: String| QueueError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        let base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }
        Ok(Self {
            client,
            base_url: base,
            token,
            default_queue: default_queue.into(),
        })
    }

    fn jobs_url(&self, queue: &str) -> Url {
        let mut url = self.base_url.clone();
        // Base URLs are checked in `new`, so the segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("queues").push(queue).push("jobs");
        }
        url
    }
}

#[async_trait]
impl QueueConnection for HttpConnection {
    async fn push_raw(&self, queue: &str, payload: &str) -> Result<(), QueueError> {
        let mut request = self
            .client
            .post(self.jobs_url(queue))
            .header("content-type", "application/json")
            .body(payload.to_string());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(QueueError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    fn default_queue(&self) -> &str {
        &self.default_queue
    }
}
