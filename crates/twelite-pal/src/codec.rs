//! Line splitting for the gateway UART stream.
//!
//! The gateway prints one line per received packet, terminated with CRLF.
//! Bytes arrive in arbitrary chunks, so they are accumulated until a
//! terminator is seen. A bare LF is accepted as well, which lets capture
//! files saved with Unix line endings replay unchanged.

use bytes::{Buf, BytesMut};

/// Longest line kept while waiting for a terminator.
///
/// 255 entries of 12 digits plus header and checksums fit comfortably.
pub const MAX_LINE_LENGTH: usize = 4096;

/// A codec that turns a byte stream into CRLF-stripped text lines.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
    /// Number of overlong fragments thrown away.
    discarded: u64,
}

impl LineCodec {
    /// Create a new line codec.
    pub fn new() -> Self {
        LineCodec {
            buffer: BytesMut::with_capacity(512),
            discarded: 0,
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to decode a complete line from the buffer.
    ///
    /// Returns `None` when more data is needed. Empty lines are skipped.
    pub fn decode_line(&mut self) -> Option<String> {
        loop {
            let Some(end) = self.buffer.iter().position(|&b| b == b'\n') else {
                if self.buffer.len() > MAX_LINE_LENGTH {
                    log::warn!(
                        "discarding {} bytes without a line terminator",
                        self.buffer.len()
                    );
                    self.buffer.clear();
                    self.discarded += 1;
                }
                return None;
            };

            let mut line = self.buffer.split_to(end);
            self.buffer.advance(1);
            if line.last() == Some(&b'\r') {
                line.truncate(line.len() - 1);
            }

            if line.is_empty() {
                continue;
            }
            if line.len() > MAX_LINE_LENGTH {
                log::warn!("discarding overlong line of {} bytes", line.len());
                self.discarded += 1;
                continue;
            }

            return Some(String::from_utf8_lossy(&line).into_owned());
        }
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Number of overlong fragments discarded so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line() {
        let mut codec = LineCodec::new();
        codec.push(b":0011\r\n:2233\r\n");

        assert_eq!(codec.decode_line(), Some(":0011".to_string()));
        assert_eq!(codec.decode_line(), Some(":2233".to_string()));
        assert!(codec.decode_line().is_none());
        assert_eq!(codec.buffered_len(), 0);
    }

    #[test]
    fn test_partial_line() {
        let mut codec = LineCodec::new();
        codec.push(b":00");
        assert!(codec.decode_line().is_none());

        codec.push(b"11\r");
        assert!(codec.decode_line().is_none());

        codec.push(b"\n:22");
        assert_eq!(codec.decode_line(), Some(":0011".to_string()));
        assert!(codec.decode_line().is_none());
        assert_eq!(codec.buffered_len(), 3);
    }

    #[test]
    fn test_bare_lf_and_empty_lines() {
        let mut codec = LineCodec::new();
        codec.push(b"\r\n\n:AB\n");
        assert_eq!(codec.decode_line(), Some(":AB".to_string()));
        assert!(codec.decode_line().is_none());
    }

    #[test]
    fn test_interior_cr_is_kept() {
        let mut codec = LineCodec::new();
        codec.push(b":A\rB\r\n");
        assert_eq!(codec.decode_line(), Some(":A\rB".to_string()));
    }

    #[test]
    fn test_overlong_garbage_is_discarded() {
        let mut codec = LineCodec::new();
        codec.push(&vec![b'X'; MAX_LINE_LENGTH + 1]);
        assert!(codec.decode_line().is_none());
        assert_eq!(codec.buffered_len(), 0);
        assert_eq!(codec.discarded(), 1);

        codec.push(b":CD\r\n");
        assert_eq!(codec.decode_line(), Some(":CD".to_string()));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut codec = LineCodec::new();
        codec.push(b":\xFF\xFE\r\n");
        let line = codec.decode_line().unwrap();
        assert!(line.starts_with(':'));
        assert!(line.contains('\u{FFFD}'));
    }
}
