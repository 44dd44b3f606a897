//! Error types for the daemon.

use mailbox_core::DispatchError;
use thiserror::Error;

use crate::source::SourceError;

/// Errors that stop the daemon.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A required setting was not supplied.
    #[error("missing setting: {flag} (or environment variable {env})")]
    MissingSetting {
        /// Command line flag.
        flag: &'static str,
        /// Environment variable.
        env: &'static str,
    },

    /// No serial port from the expected manufacturer is attached.
    #[error("no serial port from manufacturer {manufacturer:?} found")]
    PortNotFound {
        /// Manufacturer string searched for.
        manufacturer: String,
    },

    /// Serial port enumeration or open failed.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error opening an input file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The line source failed.
    #[error("line source: {0}")]
    Source(#[from] SourceError),

    /// The notification worker could not be started.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The Ctrl-C handler could not be installed.
    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    /// The metrics exporter could not be installed.
    #[error("metrics exporter: {0}")]
    Metrics(String),
}

/// Result type alias for daemon operations.
pub type RunnerResult<T> = Result<T, RunnerError>;
