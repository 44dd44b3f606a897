//! Mailbox notifier daemon.
//!
//! Reads TWELITE PAL lines from a USB gateway (or a capture file), tracks
//! the open/close sensor's magnetic status and sends a LINE push message
//! whenever mail arrives.

pub mod config;
pub mod error;
pub mod line_api;
pub mod run;
pub mod source;

pub use config::{Args, InputSource};
pub use error::{RunnerError, RunnerResult};
pub use line_api::{LineMessagingNotifier, LogNotifier, PushRequest, LINE_PUSH_ENDPOINT};
pub use run::{process_source, run, RunSummary};
pub use source::{LineSource, ReaderLineSource, SourceError, SourceEvent};
