//! Command line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use mailbox_core::{MonitorConfig, DEFAULT_MESSAGE};

use crate::error::{RunnerError, RunnerResult};
use crate::line_api::LINE_PUSH_ENDPOINT;
use crate::source::{DEFAULT_BAUD_RATE, DEFAULT_MANUFACTURER};

/// Watch a TWELITE open/close sensor and push a LINE message when mail arrives.
#[derive(Debug, Clone, Parser)]
#[command(name = "mailboxd", version, about)]
pub struct Args {
    /// Serial port of the gateway (discovered by manufacturer when omitted).
    #[arg(long, short = 'p')]
    pub port: Option<String>,

    /// USB manufacturer string used to discover the gateway.
    #[arg(long, default_value = DEFAULT_MANUFACTURER)]
    pub manufacturer: String,

    /// Serial baud rate.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Replay lines from a file instead of a serial port ("-" for stdin).
    #[arg(long, short = 'i', conflicts_with = "port")]
    pub input: Option<PathBuf>,

    /// LINE channel access token.
    #[arg(long, env = "MAILBOX_CHANNEL_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Recipient (LINE user, group or room ID).
    #[arg(long, env = "MAILBOX_TO")]
    pub to: Option<String>,

    /// Notification text.
    #[arg(long, default_value = DEFAULT_MESSAGE)]
    pub message: String,

    /// Push API endpoint.
    #[arg(long, default_value = LINE_PUSH_ENDPOINT)]
    pub endpoint: String,

    /// Timeout for one push request, in seconds.
    #[arg(long, default_value_t = 10)]
    pub notify_timeout: u64,

    /// Log notifications instead of sending them.
    #[arg(long)]
    pub dry_run: bool,

    /// List serial ports and exit.
    #[arg(long)]
    pub list_ports: bool,

    /// Serve Prometheus metrics on this address.
    #[cfg(feature = "prometheus")]
    #[arg(long)]
    pub metrics_addr: Option<std::net::SocketAddr>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Where lines are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A serial port; `None` means discover it.
    Serial(Option<String>),
    /// A capture file.
    File(PathBuf),
    /// Standard input.
    Stdin,
}

impl Args {
    /// Check settings that clap cannot express.
    pub fn validate(&self) -> RunnerResult<()> {
        if self.dry_run {
            return Ok(());
        }
        if is_blank(&self.token) {
            return Err(RunnerError::MissingSetting {
                flag: "--token",
                env: "MAILBOX_CHANNEL_ACCESS_TOKEN",
            });
        }
        if is_blank(&self.to) {
            return Err(RunnerError::MissingSetting {
                flag: "--to",
                env: "MAILBOX_TO",
            });
        }
        Ok(())
    }

    /// The configured line source.
    pub fn input_source(&self) -> InputSource {
        match &self.input {
            Some(path) if path.as_os_str() == "-" => InputSource::Stdin,
            Some(path) => InputSource::File(path.clone()),
            None => InputSource::Serial(self.port.clone()),
        }
    }

    /// Recipient and message for the monitor.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::new(self.to.clone().unwrap_or_default()).with_message(&self.message)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
