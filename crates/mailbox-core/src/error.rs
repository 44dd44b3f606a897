//! Error types for status tracking and notification.

use thiserror::Error;

/// Errors reported by a [`Notifier`](crate::Notifier).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// The request could not be sent (connection, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote service answered with an error.
    #[error("rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// The notifier is not configured to deliver anything.
    #[error("notifier unavailable")]
    Unavailable,
}

/// Errors from the notification dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The worker thread could not be started.
    #[error("failed to spawn dispatcher thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker has stopped and no longer accepts notifications.
    #[error("dispatcher is closed")]
    Closed,
}
