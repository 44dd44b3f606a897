//! TWELITE PAL gateway protocol
//!
//! This crate decodes the telemetry emitted by a TWELITE parent (gateway)
//! running in PAL mode. Every received packet is printed on the gateway's
//! UART as a single ASCII-hex line terminated with CRLF.
//!
//! # Line Format
//!
//! ```text
//! ":" relay_serial(8) lqi(2) seq(4) sender_serial(8) logical_id(2)
//!     sensor_type(2) pal_version(2) entry_count(2)
//!     { info(2) source(2) type(2) length(2) value(2|4) } * entry_count
//!     checksum1(2|4|8) checksum2(2)
//! ```
//!
//! Numbers in parentheses are hex digit counts. The width of each entry's
//! value field follows its own declared byte length.
//!
//! # Example
//!
//! ```rust,ignore
//! use twelite_pal::{LineCodec, SensorFrame};
//!
//! let mut codec = LineCodec::new();
//! codec.push(&bytes_from_uart);
//! while let Some(line) = codec.decode_line() {
//!     let frame = SensorFrame::decode(&line)?;
//!     if let Some(status) = frame.magnetic_status() {
//!         println!("reed switch: {status}");
//!     }
//! }
//! ```

mod codec;
pub mod constants;
mod entry;
mod error;
mod frame;

pub use codec::*;
pub use entry::*;
pub use error::*;
pub use frame::*;
