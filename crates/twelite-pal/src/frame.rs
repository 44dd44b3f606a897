//! Line-to-frame decoding.
//!
//! A line is a sequence of fixed-width hex fields after the `:` prefix.
//! The header is positional, the entry count drives how many entries follow,
//! and each entry's declared byte length selects the width of its value.
//!
//! | Field            | Hex digits | Description                              |
//! |------------------|------------|------------------------------------------|
//! | relay_serial_id  | 8          | Serial ID of the relaying node           |
//! | link_quality     | 2          | LQI                                       |
//! | sequence_number  | 4          | Running packet counter                    |
//! | sender_serial_id | 8          | Serial ID of the originating node         |
//! | logical_id       | 2          | Sender's logical device ID                |
//! | sensor_type      | 2          | Sensor kind                               |
//! | pal_version      | 2          | PAL board version and board ID            |
//! | entry_count      | 2          | Number of data entries                    |
//! | entries          | 10 or 12   | Repeated `entry_count` times              |
//! | checksum1        | 2, 4 or 8  | Advisory                                  |
//! | checksum2        | 2          | LRC over every preceding byte (advisory)  |

use std::str::FromStr;

use crate::constants::{
    CHECKSUM2_DIGITS, HEADER_DIGITS, LINE_PREFIX, MIN_ENTRY_DIGITS, MIN_TRAILER_DIGITS,
};
use crate::error::{DecodeError, DecodeResult};

/// One sensor reading carried by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataEntry {
    /// Info bits (size/flags byte).
    pub data_size: u8,
    /// Data source (`0x00` magnetic, `0x30` ADC, ...).
    pub data_source: u8,
    /// Sub-kind within the source (extension byte).
    pub data_type: u8,
    /// Declared byte length of the value (1 or 2).
    pub data_length: u8,
    /// Raw value.
    pub data_value: u16,
}

impl DataEntry {
    /// Hex digits used on the wire for a value of the given declared length.
    ///
    /// Returns `None` for lengths the decoder does not support.
    pub fn value_digits(data_length: u8) -> Option<usize> {
        match data_length {
            1 => Some(2),
            2 => Some(4),
            _ => None,
        }
    }
}

/// A decoded gateway line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorFrame {
    /// Serial ID of the relaying node.
    pub relay_serial_id: u32,
    /// Link quality indicator.
    pub link_quality: u8,
    /// Sequence number.
    pub sequence_number: u16,
    /// Serial ID of the originating node.
    pub sender_serial_id: u32,
    /// Logical device ID of the originating node.
    pub sender_logical_device_id: u8,
    /// Sensor type.
    pub sensor_type: u8,
    /// PAL board version/ID byte.
    pub pal_version: u8,
    /// Data entries, in wire order.
    pub entries: Vec<DataEntry>,
    /// First trailing checksum field.
    pub checksum1: u32,
    /// Second trailing checksum field (LRC).
    pub checksum2: u8,
    /// Whether the LRC checked out when the line was decoded.
    ///
    /// A mismatch never causes the line to be rejected.
    pub checksum_valid: bool,
}

impl SensorFrame {
    /// Decode a CRLF-stripped gateway line.
    pub fn decode(line: &str) -> DecodeResult<SensorFrame> {
        decode(line)
    }

    /// Encode the frame back to wire text (without CRLF).
    ///
    /// The stored checksum fields are written as they are. `checksum1` uses
    /// the narrowest of 2, 4 or 8 digits that holds its value.
    ///
    /// The entry count and one-byte values are written as a single byte:
    /// frames with more than 255 entries, or a `data_length == 1` entry whose
    /// value exceeds `0xFF`, keep only the low byte.
    pub fn encode(&self) -> String {
        let mut bytes = self.body_bytes();
        bytes.push(self.checksum2);
        let mut line = String::with_capacity(1 + bytes.len() * 2);
        line.push(LINE_PREFIX as char);
        line.push_str(&hex::encode_upper(bytes));
        line
    }

    /// Recompute `checksum2` so the frame's LRC checks out.
    pub fn with_lrc(mut self) -> Self {
        let sum = self
            .body_bytes()
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b));
        self.checksum2 = 0u8.wrapping_sub(sum);
        self.checksum_valid = true;
        self
    }

    /// Every byte of the frame on the wire except `checksum2`.
    fn body_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(15 + self.entries.len() * 6 + 4);
        buf.extend_from_slice(&self.relay_serial_id.to_be_bytes());
        buf.push(self.link_quality);
        buf.extend_from_slice(&self.sequence_number.to_be_bytes());
        buf.extend_from_slice(&self.sender_serial_id.to_be_bytes());
        buf.push(self.sender_logical_device_id);
        buf.push(self.sensor_type);
        buf.push(self.pal_version);
        buf.push(self.entries.len() as u8);

        for entry in &self.entries {
            buf.push(entry.data_size);
            buf.push(entry.data_source);
            buf.push(entry.data_type);
            buf.push(entry.data_length);
            if entry.data_length == 1 {
                buf.push(entry.data_value as u8);
            } else {
                buf.extend_from_slice(&entry.data_value.to_be_bytes());
            }
        }

        let checksum1 = self.checksum1.to_be_bytes();
        let width = match self.checksum1 {
            0..=0xFF => 1,
            0x100..=0xFFFF => 2,
            _ => 4,
        };
        buf.extend_from_slice(&checksum1[4 - width..]);
        buf
    }
}

impl FromStr for SensorFrame {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Positional reader over the hex digits that follow the prefix.
///
/// Keeps a running LRC of every byte it has produced.
struct FieldReader<'a> {
    digits: &'a [u8],
    pos: usize,
    lrc: u8,
}

impl<'a> FieldReader<'a> {
    fn new(digits: &'a [u8]) -> Self {
        FieldReader {
            digits,
            pos: 0,
            lrc: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.digits.len() - self.pos
    }

    /// Offset of the next field within the full line (the prefix is 0).
    fn offset(&self) -> usize {
        self.pos + 1
    }

    /// Read a field of `width` hex digits (an even number, at most 8).
    fn read(&mut self, width: usize, name: &str) -> DecodeResult<u32> {
        let field_offset = self.offset();
        let Some(field) = self.digits.get(self.pos..self.pos + width) else {
            return Err(DecodeError::malformed_at(
                field_offset,
                format!(
                    "{name} needs {width} hex digits, {} left",
                    self.remaining()
                ),
            ));
        };

        let mut raw = [0u8; 4];
        let raw = &mut raw[..width / 2];
        hex::decode_to_slice(field, raw).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, index } => DecodeError::malformed_at(
                field_offset + index,
                format!("invalid hex character {c:?} in {name}"),
            ),
            other => DecodeError::malformed_at(field_offset, format!("{name}: {other}")),
        })?;

        self.pos += width;
        let mut value = 0u32;
        for &byte in raw.iter() {
            self.lrc = self.lrc.wrapping_add(byte);
            value = (value << 8) | u32::from(byte);
        }
        Ok(value)
    }

    fn read_u8(&mut self, name: &str) -> DecodeResult<u8> {
        self.read(2, name).map(|v| v as u8)
    }

    fn read_u16(&mut self, name: &str) -> DecodeResult<u16> {
        self.read(4, name).map(|v| v as u16)
    }

    fn read_u32(&mut self, name: &str) -> DecodeResult<u32> {
        self.read(8, name)
    }
}

/// Decode a CRLF-stripped gateway line into a [`SensorFrame`].
///
/// This is a pure function of `line`.
pub fn decode(line: &str) -> DecodeResult<SensorFrame> {
    let bytes = line.as_bytes();
    if bytes.first() != Some(&LINE_PREFIX) {
        return Err(DecodeError::MissingPrefix);
    }
    let mut reader = FieldReader::new(&bytes[1..]);
    if reader.remaining() < HEADER_DIGITS {
        return Err(DecodeError::malformed_at(
            reader.offset(),
            format!(
                "header needs {HEADER_DIGITS} hex digits, {} left",
                reader.remaining()
            ),
        ));
    }

    let relay_serial_id = reader.read_u32("relay serial")?;
    let link_quality = reader.read_u8("link quality")?;
    let sequence_number = reader.read_u16("sequence number")?;
    let sender_serial_id = reader.read_u32("sender serial")?;
    let sender_logical_device_id = reader.read_u8("logical device id")?;
    let sensor_type = reader.read_u8("sensor type")?;
    let pal_version = reader.read_u8("pal version")?;
    let declared = usize::from(reader.read_u8("entry count")?);

    let mut entries = Vec::with_capacity(declared);
    for index in 0..declared {
        // the remaining entries and the trailer must still fit at their narrowest
        if reader.remaining() < (declared - index) * MIN_ENTRY_DIGITS + MIN_TRAILER_DIGITS {
            return Err(DecodeError::TruncatedEntry { index, declared });
        }
        let data_size = reader.read_u8("data size")?;
        let data_source = reader.read_u8("data source")?;
        let data_type = reader.read_u8("data type")?;
        let length_offset = reader.offset();
        let data_length = reader.read_u8("data length")?;

        let Some(width) = DataEntry::value_digits(data_length) else {
            return Err(DecodeError::malformed_at(
                length_offset,
                format!("unsupported data length {data_length} in entry {index}"),
            ));
        };
        if reader.remaining() < width {
            return Err(DecodeError::TruncatedEntry { index, declared });
        }
        let data_value = reader.read(width, "data value")? as u16;

        entries.push(DataEntry {
            data_size,
            data_source,
            data_type,
            data_length,
            data_value,
        });
    }

    let checksum1_digits = match reader.remaining() {
        4 => 2,
        6 => 4,
        10 => 8,
        n => {
            return Err(DecodeError::malformed_at(
                reader.offset(),
                format!("expected 4, 6 or 10 checksum digits, found {n}"),
            ));
        }
    };
    let checksum1 = reader.read(checksum1_digits, "checksum1")?;
    let checksum2 = reader.read(CHECKSUM2_DIGITS, "checksum2")? as u8;
    let checksum_valid = reader.lrc == 0;

    Ok(SensorFrame {
        relay_serial_id,
        link_quality,
        sequence_number,
        sender_serial_id,
        sender_logical_device_id,
        sensor_type,
        pal_version,
        entries,
        checksum1,
        checksum2,
        checksum_valid,
    })
}
