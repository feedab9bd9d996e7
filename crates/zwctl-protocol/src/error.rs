//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when encoding or decoding controller payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A field reaches past the end of the payload.
    #[error("field at offset {offset} (width {width}) out of range for payload of {len} bytes")]
    OutOfRange {
        /// Offset of the field.
        offset: usize,
        /// Width of the field in bytes.
        width: usize,
        /// Actual payload length.
        len: usize,
    },

    /// Payload is too short to be valid.
    #[error("malformed payload: expected at least {expected} bytes, got {actual}")]
    MalformedPayload {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Subcommand tag not known to the command class.
    #[error("unknown subcommand: 0x{0:02X}")]
    UnknownSubcommand(u8),

    /// Field width the codec cannot decode.
    #[error("invalid field width: {0}")]
    InvalidWidth(usize),

    /// Payload does not fit in a single frame.
    #[error("payload too large: maximum {max} bytes, got {actual}")]
    PayloadTooLarge {
        /// Maximum allowed length.
        max: usize,
        /// Actual length.
        actual: usize,
    },
}

impl ProtocolError {
    /// Create an out-of-range error for a field.
    pub fn out_of_range(offset: usize, width: usize, len: usize) -> Self {
        ProtocolError::OutOfRange { offset, width, len }
    }

    /// Whether the error comes from a payload that was too short.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            ProtocolError::OutOfRange { .. } | ProtocolError::MalformedPayload { .. }
        )
    }
}
