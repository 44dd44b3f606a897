//! Gateway line → mailbox status pipeline.

use mailbox_metrics::metric_defs;
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};
use twelite_pal::{magnetic_status, DecodeError, SensorFrame};

use crate::dispatch::NotificationDispatcher;
use crate::notifier::{Notification, DEFAULT_MESSAGE};
use crate::status::{MailboxStatus, StatusUpdate};

/// Who gets notified, and with what text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Recipient identifier handed to the notifier.
    pub recipient: String,
    /// Message text.
    pub message: String,
}

impl MonitorConfig {
    /// Config for `recipient` with the default message.
    pub fn new(recipient: impl Into<String>) -> Self {
        MonitorConfig {
            recipient: recipient.into(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }

    /// Replace the message text.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// What happened to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The decoder rejected the line; the status was not touched.
    Rejected(DecodeError),
    /// The frame carried no magnetic entry.
    NoMagneticEntry(SensorFrame),
    /// The frame's magnetic status was applied.
    Observed {
        /// The decoded frame.
        frame: SensorFrame,
        /// Effect on the status.
        update: StatusUpdate,
    },
}

/// Serialises status updates and hands notifications to the dispatcher.
///
/// `observe` runs read-compare-write under a lock, so concurrent callers
/// cannot both act on a stale status. The notification is queued after the
/// lock is released.
pub struct MailboxMonitor {
    status: Mutex<MailboxStatus>,
    dispatcher: NotificationDispatcher,
    config: MonitorConfig,
}

impl MailboxMonitor {
    /// Create a monitor starting from the initial status 0.
    pub fn new(config: MonitorConfig, dispatcher: NotificationDispatcher) -> Self {
        MailboxMonitor {
            status: Mutex::new(MailboxStatus::new()),
            dispatcher,
            config,
        }
    }

    /// Start from a given status instead of 0.
    pub fn with_status(mut self, status: MailboxStatus) -> Self {
        self.status = Mutex::new(status);
        self
    }

    /// The monitor's configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// The stored magnetic status.
    pub fn current_status(&self) -> u8 {
        self.status.lock().current()
    }

    /// Apply one magnetic reading.
    pub fn observe(&self, value: u8) -> StatusUpdate {
        let update = self.status.lock().update(value);

        match update {
            StatusUpdate::Unchanged { current } => {
                trace!(status = current, "status unchanged");
            }
            StatusUpdate::Changed { previous, current } => {
                debug!(previous, current, "status changed");
            }
            StatusUpdate::MailArrived { previous } => {
                info!(previous, "mail arrived");
            }
        }

        if update.is_transition() {
            metrics::counter!(metric_defs::STATUS_TRANSITIONS.name).increment(1);
            metrics::gauge!(metric_defs::STATUS_CURRENT.name).set(f64::from(update.current()));
        }

        if update.should_notify() {
            let notification = Notification::new(&self.config.message, &self.config.recipient);
            if let Err(e) = self.dispatcher.dispatch(notification) {
                warn!(error = %e, "could not queue notification");
            }
        }

        update
    }

    /// Decode a line and apply its magnetic status, if any.
    ///
    /// Never fails: rejected lines are logged and reported in the outcome.
    pub fn process_line(&self, line: &str) -> LineOutcome {
        metrics::counter!(metric_defs::LINES_RECEIVED.name).increment(1);

        let frame = match SensorFrame::decode(line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(line = %line, error = %e, "line is not handled");
                metrics::counter!(
                    metric_defs::FRAMES_REJECTED.name,
                    metric_defs::REASON_LABEL => e.reason_label()
                )
                .increment(1);
                return LineOutcome::Rejected(e);
            }
        };
        metrics::counter!(metric_defs::FRAMES_DECODED.name).increment(1);

        if !frame.checksum_valid {
            warn!(
                sender = %format!("{:08X}", frame.sender_serial_id),
                sequence = frame.sequence_number,
                "checksum mismatch, using frame anyway"
            );
            metrics::counter!(metric_defs::CHECKSUM_MISMATCH.name).increment(1);
        }

        debug!(
            sender = %format!("{:08X}", frame.sender_serial_id),
            sequence = frame.sequence_number,
            lqi = frame.link_quality,
            entries = frame.entries.len(),
            "frame decoded"
        );

        match magnetic_status(&frame) {
            Some(value) => {
                let update = self.observe(value);
                LineOutcome::Observed { frame, update }
            }
            None => LineOutcome::NoMagneticEntry(frame),
        }
    }

    /// Number of notifications waiting for the worker.
    pub fn pending_notifications(&self) -> usize {
        self.dispatcher.pending()
    }

    /// Stop accepting lines and wait for queued notifications.
    pub fn shutdown(self) {
        self.dispatcher.shutdown();
    }
}
