//! Notifier port.

use std::sync::Arc;

use crate::error::NotifyError;

/// Message sent when mail arrives, unless configured otherwise.
pub const DEFAULT_MESSAGE: &str = "Incoming mail";

/// A capability that delivers a text message to a recipient.
///
/// Implementations own their own timeout and retry policy. The dispatcher
/// calls `send` from its worker thread, at most once per queued
/// notification.
pub trait Notifier: Send + Sync {
    /// Deliver `message` to `recipient`.
    fn send(&self, message: &str, recipient: &str) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn send(&self, message: &str, recipient: &str) -> Result<(), NotifyError> {
        (**self).send(message, recipient)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn send(&self, message: &str, recipient: &str) -> Result<(), NotifyError> {
        (**self).send(message, recipient)
    }
}

/// A notification waiting to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Text to send.
    pub message: String,
    /// Recipient identifier, meaning defined by the notifier.
    pub recipient: String,
}

impl Notification {
    /// Create a notification.
    pub fn new(message: impl Into<String>, recipient: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            recipient: recipient.into(),
        }
    }
}
