use thiserror::Error;

/// Errors raised while pushing a raw payload onto a queue.
#[derive(Debug, Error)]
pub enum QueueError {
    /// No connection with this name is configured.
    #[error("queue connection [{0}] is not configured")]
    UnknownConnection(String),

    /// The queue name cannot be used as a destination by this driver.
    #[error("invalid queue name [{0}]")]
    InvalidQueue(String),

    /// A configured endpoint URL cannot be used as a base for job URLs.
    #[error("invalid queue URL [{url}]: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The queue endpoint answered with a non-success status.
    #[error("queue rejected job (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("queue I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("queue network error: {0}")]
    Http(#[from] reqwest::Error),
}
