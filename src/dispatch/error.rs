//! Dispatch-specific error types.
//!
//! Separate from `ApiError` so the queue and executors stay usable
//! without the HTTP host.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Webhook unreachable: {0}")]
    Transport(String),

    #[error("Webhook request timed out after {0}s")]
    Timeout(u64),

    #[error("Webhook returned HTTP {status}")]
    Http { status: u16, body: String },

    #[error("Payload serialization failed: {0}")]
    Serialization(String),

    #[error("Dispatch executor panicked")]
    ExecutorPanicked,

    #[error("Entity {0} already has a pending dispatch")]
    AlreadyInFlight(String),

    #[error("Dispatch queue is closed")]
    QueueClosed,
}

impl DispatchError {
    /// Map a reqwest failure into the transport/timeout variants.
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout(timeout_secs)
        } else {
            DispatchError::Transport(err.to_string())
        }
    }
}

/// Failure of the secondary "mark as requested" update.
///
/// Never fails a dispatch on its own: it is carried inside the outcome
/// and surfaced as a warning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusSyncError {
    #[error("Backend URL is not configured")]
    NotConfigured,

    #[error("Cannot build backend URL: {0}")]
    InvalidUrl(String),

    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {0}")]
    Http(u16),
}
