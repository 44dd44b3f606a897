//! Asynchronous notification delivery.
//!
//! Deciding to notify happens on the caller's thread; delivering happens on
//! a dedicated worker that drains an unbounded queue. Delivery results are
//! logged and counted, never retried, and never reported back to the
//! caller.

use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use mailbox_metrics::metric_defs;
use tracing::{debug, info, warn};

use crate::error::DispatchError;
use crate::notifier::{Notification, Notifier};

/// Handle to the notification worker thread.
///
/// Dropping the handle closes the queue and waits for queued notifications
/// to be delivered.
pub struct NotificationDispatcher {
    tx: Option<Sender<Notification>>,
    thread: Option<JoinHandle<()>>,
}

impl NotificationDispatcher {
    /// Start a worker thread delivering through `notifier`.
    pub fn spawn<N: Notifier + 'static>(notifier: N) -> Result<Self, DispatchError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let thread = thread::Builder::new()
            .name("mailbox-notify".to_string())
            .spawn(move || dispatch_worker(notifier, rx))?;

        Ok(NotificationDispatcher {
            tx: Some(tx),
            thread: Some(thread),
        })
    }

    /// Queue a notification without waiting for delivery.
    pub fn dispatch(&self, notification: Notification) -> Result<(), DispatchError> {
        let tx = self.tx.as_ref().ok_or(DispatchError::Closed)?;
        tx.send(notification).map_err(|_| DispatchError::Closed)
    }

    /// Number of notifications queued but not yet picked up.
    pub fn pending(&self) -> usize {
        self.tx.as_ref().map_or(0, Sender::len)
    }

    /// Close the queue and wait until every queued notification was handled.
    pub fn shutdown(mut self) {
        self.close_and_join();
    }

    fn close_and_join(&mut self) {
        drop(self.tx.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("notification worker panicked");
            }
        }
    }
}

impl Drop for NotificationDispatcher {
    fn drop(&mut self) {
        self.close_and_join();
    }
}

/// Worker loop: deliver until every sender is gone.
fn dispatch_worker<N: Notifier>(notifier: N, rx: Receiver<Notification>) {
    debug!("notification worker started");

    for notification in rx.iter() {
        let started = Instant::now();
        let result = notifier.send(&notification.message, &notification.recipient);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!(metric_defs::NOTIFY_LATENCY.name).record(elapsed_ms);

        match result {
            Ok(()) => {
                info!(
                    recipient = %notification.recipient,
                    elapsed_ms = elapsed_ms,
                    "notification sent"
                );
                metrics::counter!(metric_defs::NOTIFY_SENT.name).increment(1);
            }
            Err(e) => {
                warn!(
                    recipient = %notification.recipient,
                    error = %e,
                    "notification failed"
                );
                metrics::counter!(metric_defs::NOTIFY_FAILED.name).increment(1);
            }
        }
    }

    debug!("notification worker stopped");
}
