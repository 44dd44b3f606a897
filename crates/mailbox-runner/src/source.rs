//! Line sources: where gateway lines come from.
//!
//! The gateway is normally a USB serial device. Capture files and stdin
//! can stand in for it, which is how recorded traffic gets replayed.

use std::io::{self, Read};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use thiserror::Error;
use tracing::{debug, info};
use twelite_pal::LineCodec;

use crate::error::RunnerError;

/// Manufacturer string reported by TWELITE USB gateways.
pub const DEFAULT_MANUFACTURER: &str = "MONOWIRELESS";

/// Default UART speed of the gateway.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// How long a serial read waits before reporting the source idle.
pub const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Errors from a line source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the underlying stream failed.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

/// One poll of a line source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// A complete, CRLF-stripped line.
    Line(String),
    /// No complete line yet; poll again.
    Idle,
    /// The stream ended.
    Closed,
}

/// Produces CRLF-stripped lines from an underlying byte stream.
pub trait LineSource {
    /// Wait for the next line, an idle timeout, or the end of the stream.
    fn poll_line(&mut self) -> Result<SourceEvent, SourceError>;
}

/// A [`LineSource`] over anything readable.
///
/// Read timeouts (as produced by a serial port) are reported as
/// [`SourceEvent::Idle`]; end of file closes the source.
pub struct ReaderLineSource<R> {
    reader: R,
    codec: LineCodec,
    buf: Vec<u8>,
    eof: bool,
}

impl<R: Read> ReaderLineSource<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        ReaderLineSource {
            reader,
            codec: LineCodec::new(),
            buf: vec![0u8; 1024],
            eof: false,
        }
    }

    /// Lines dropped for exceeding the maximum length.
    pub fn discarded(&self) -> u64 {
        self.codec.discarded()
    }
}

impl<R: Read> LineSource for ReaderLineSource<R> {
    fn poll_line(&mut self) -> Result<SourceEvent, SourceError> {
        loop {
            if let Some(line) = self.codec.decode_line() {
                return Ok(SourceEvent::Line(line));
            }
            if self.eof {
                if self.codec.buffered_len() > 0 {
                    debug!(
                        bytes = self.codec.buffered_len(),
                        "dropping unterminated tail at end of stream"
                    );
                    self.codec.clear();
                }
                return Ok(SourceEvent::Closed);
            }

            match self.reader.read(&mut self.buf) {
                Ok(0) => self.eof = true,
                Ok(n) => self.codec.push(&self.buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => return Ok(SourceEvent::Idle),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Find the first USB serial port from `manufacturer`.
pub fn find_port(manufacturer: &str) -> Result<String, RunnerError> {
    let ports = serialport::available_ports()?;

    ports
        .into_iter()
        .find_map(|port| match &port.port_type {
            SerialPortType::UsbPort(info) if info.manufacturer.as_deref() == Some(manufacturer) => {
                Some(port.port_name.clone())
            }
            _ => None,
        })
        .ok_or_else(|| RunnerError::PortNotFound {
            manufacturer: manufacturer.to_string(),
        })
}

/// Open the gateway at 8N1 without flow control.
pub fn open_serial(port_name: &str, baud_rate: u32) -> Result<Box<dyn SerialPort>, RunnerError> {
    let port = serialport::new(port_name, baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()?;

    info!(port = port_name, baud_rate, "serial port opened");
    Ok(port)
}

/// One line per available serial port, for `--list-ports`.
pub fn describe_ports() -> Result<Vec<String>, RunnerError> {
    let ports = serialport::available_ports()?;

    Ok(ports
        .into_iter()
        .map(|port| match port.port_type {
            SerialPortType::UsbPort(info) => format!(
                "{} (USB {:04x}:{:04x}, manufacturer: {}, product: {})",
                port.port_name,
                info.vid,
                info.pid,
                info.manufacturer.as_deref().unwrap_or("unknown"),
                info.product.as_deref().unwrap_or("unknown"),
            ),
            SerialPortType::PciPort => format!("{} (PCI)", port.port_name),
            SerialPortType::BluetoothPort => format!("{} (Bluetooth)", port.port_name),
            SerialPortType::Unknown => format!("{} (unknown)", port.port_name),
        })
        .collect())
}
