//! Queue connection that spools payloads into a directory tree.
//!
//! Each pushed job becomes `<root>/<queue>/<unix-millis>-<uuid>.json`. Files
//! are written under a dot-prefixed temp name and renamed into place, so a
//! worker scanning the directory never picks up a half-written job.
//!
//! The queue name must be a single plain path component. Absolute names,
//! `..` and names containing a separator are rejected, so every file stays
//! under the spool root.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use super::QueueConnection;
use super::error::QueueError;

pub struct SpoolConnection {
    root: PathBuf,
    default_queue: String,
}

impl SpoolConnection {
    pub fn new(root: impl Into<PathBuf>, default_queue: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_queue: default_queue.into(),
        }
    }

    fn queue_dir(&self, queue: &str) -> Result<PathBuf, QueueError> {
        let mut parts = Path::new(queue).components();
        match (parts.next(), parts.next()) {
            (Some(Component::Normal(name)), None) if name == queue => Ok(self.root.join(name)),
            _ => Err(QueueError::InvalidQueue(queue.to_owned())),
        }
    }
}

#[async_trait]
impl QueueConnection for SpoolConnection {
    async fn push_raw(&self, queue: &str, payload: &str) -> Result<(), QueueError> {
        let dir = self.queue_dir(queue)?;
        fs::create_dir_all(&dir).await?;

        let name = format!("{}-{}.json", Utc::now().timestamp_millis(), Uuid::new_v4());
        let tmp = dir.join(format!(".{name}.tmp"));
        fs::write(&tmp, payload).await?;
        fs::rename(&tmp, dir.join(&name)).await?;

        tracing::debug!(queue, file = %name, "spooled job");
        Ok(())
    }

    fn default_queue(&self) -> &str {
        &self.default_queue
    }
}
