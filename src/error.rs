use thiserror::Error;

use crate::failed::StoreError;
use crate::queue::QueueError;

#[derive(Debug, Error)]
pub enum RequeueError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed job store error: {0}")]
    Store(#[from] StoreError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RequeueError = StoreError::Io(io).into();
        assert_eq!(err.to_string(), "Failed job store error: failed-job store I/O error: gone");
    }

    #[test]
    fn config_error_display() {
        let err = RequeueError::Config("no connections".into());
        assert_eq!(err.to_string(), "Config error: no connections");
    }
}
