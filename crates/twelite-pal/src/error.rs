//! Error types for the PAL line decoder.

use thiserror::Error;

/// Errors that can occur when decoding a gateway line.
///
/// All of these are recoverable: the offending line is dropped and the
/// caller moves on to the next one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The line does not start with `:`.
    #[error("line does not start with ':'")]
    MissingPrefix,

    /// A field is short, holds a non-hex character, or the line has the
    /// wrong number of trailing characters.
    #[error("malformed line at offset {offset}: {reason}")]
    Malformed {
        /// Character offset in the line (the `:` is offset 0).
        offset: usize,
        /// Description of the problem.
        reason: String,
    },

    /// The entry count promises more entries than the line carries.
    #[error("line ends inside entry {index} of {declared}")]
    TruncatedEntry {
        /// Zero-based index of the first entry for which the rest of the
        /// line is too short to hold the remaining entries and the trailer.
        index: usize,
        /// Entry count declared in the header.
        declared: usize,
    },
}

impl DecodeError {
    /// Create a malformed-line error at a specific offset.
    pub fn malformed_at(offset: usize, reason: impl Into<String>) -> Self {
        DecodeError::Malformed {
            offset,
            reason: reason.into(),
        }
    }

    /// Short static label, used for metric breakdowns.
    pub fn reason_label(&self) -> &'static str {
        match self {
            DecodeError::MissingPrefix => "missing_prefix",
            DecodeError::Malformed { .. } => "malformed",
            DecodeError::TruncatedEntry { .. } => "truncated_entry",
        }
    }
}

/// Result type alias for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
