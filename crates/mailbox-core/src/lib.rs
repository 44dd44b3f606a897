//! Mailbox status tracking for a TWELITE open/close sensor.
//!
//! Decoded gateway lines feed a [`MailboxMonitor`], which keeps the last
//! magnetic status in a [`MailboxStatus`] and queues an "incoming mail"
//! notification on every transition into status 0. Delivery happens on a
//! separate worker thread behind the [`Notifier`] trait, so a slow network
//! call never holds up the next line.
//!
//! ## Key Types
//!
//! - [`MailboxStatus`]: the transition-guarded state machine
//! - [`Notifier`]: "send message to recipient" capability
//! - [`NotificationDispatcher`]: worker thread that calls the notifier
//! - [`MailboxMonitor`]: line → frame → status → notification pipeline

mod dispatch;
mod error;
mod monitor;
mod notifier;
mod status;

pub use dispatch::*;
pub use error::*;
pub use monitor::*;
pub use notifier::*;
pub use status::*;
