//! Payload codec.
//!
//! Every request and response payload of a subcommand-multiplexed class has
//! the same shape:
//!
//! ```text
//! +-----+-----------------------------+
//! | tag | subcommand-specific bytes   |
//! +-----+-----------------------------+
//!   0     1..
//! ```
//!
//! The functions here hold no state and never log.

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::MAX_FIELD_WIDTH;
use crate::error::ProtocolError;
use crate::types::SubcommandTag;

/// Offset of the subcommand tag in every payload.
pub const TAG_OFFSET: usize = 0;

/// Encode a request payload: the tag byte followed by `args`.
pub fn encode(tag: SubcommandTag, args: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + args.len());
    buf.put_u8(tag.value());
    buf.extend_from_slice(args);
    buf.freeze()
}

/// Read the subcommand tag at offset 0.
pub fn read_tag(payload: &[u8]) -> Result<SubcommandTag, ProtocolError> {
    match payload.get(TAG_OFFSET) {
        Some(&tag) => Ok(SubcommandTag(tag)),
        None => Err(ProtocolError::MalformedPayload {
            expected: TAG_OFFSET + 1,
            actual: payload.len(),
        }),
    }
}

/// Test `mask` against the byte at `offset`.
pub fn decode_flag(payload: &[u8], offset: usize, mask: u8) -> Result<bool, ProtocolError> {
    byte_at(payload, offset).map(|byte| byte & mask != 0)
}

/// Interpret the byte at `offset` as a boolean (non-zero is true).
pub fn decode_bool(payload: &[u8], offset: usize) -> Result<bool, ProtocolError> {
    byte_at(payload, offset).map(|byte| byte != 0)
}

/// Decode an unsigned big-endian field of `width` bytes starting at `offset`.
pub fn decode_uint(payload: &[u8], offset: usize, width: usize) -> Result<u32, ProtocolError> {
    if width == 0 || width > MAX_FIELD_WIDTH {
        return Err(ProtocolError::InvalidWidth(width));
    }
    let end = offset
        .checked_add(width)
        .filter(|&end| end <= payload.len())
        .ok_or_else(|| ProtocolError::out_of_range(offset, width, payload.len()))?;

    Ok(payload[offset..end]
        .iter()
        .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte)))
}

fn byte_at(payload: &[u8], offset: usize) -> Result<u8, ProtocolError> {
    payload
        .get(offset)
        .copied()
        .ok_or_else(|| ProtocolError::out_of_range(offset, 1, payload.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_prepends_tag() {
        assert_eq!(&encode(SubcommandTag(0x01), &[])[..], &[0x01]);
        assert_eq!(&encode(SubcommandTag(0x02), &[0x01])[..], &[0x02, 0x01]);
        assert_eq!(&encode(SubcommandTag(0x02), &[0x00])[..], &[0x02, 0x00]);
    }

    #[test]
    fn test_read_tag() {
        assert_eq!(read_tag(&[0x02, 0x00]), Ok(SubcommandTag(0x02)));
        assert_eq!(
            read_tag(&[]),
            Err(ProtocolError::MalformedPayload {
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn test_decode_flag() {
        let payload = [0x01, 0x02];
        assert_eq!(decode_flag(&payload, 1, 0x02), Ok(true));
        assert_eq!(decode_flag(&payload, 1, 0x01), Ok(false));
        assert_eq!(
            decode_flag(&[0x01], 1, 0x02),
            Err(ProtocolError::out_of_range(1, 1, 1))
        );
    }

    #[test]
    fn test_decode_bool() {
        assert_eq!(decode_bool(&[0x02, 0x00], 1), Ok(false));
        assert_eq!(decode_bool(&[0x02, 0x01], 1), Ok(true));
        assert_eq!(decode_bool(&[0x02, 0x80], 1), Ok(true));
        assert!(decode_bool(&[0x02], 1).is_err());
    }

    #[test]
    fn test_decode_uint_widths() {
        let payload = [0x03, 0x12, 0x34, 0x56, 0x78];
        assert_eq!(decode_uint(&payload, 1, 1), Ok(0x12));
        assert_eq!(decode_uint(&payload, 1, 2), Ok(0x1234));
        assert_eq!(decode_uint(&payload, 1, 4), Ok(0x1234_5678));
        assert_eq!(
            decode_uint(&payload, 3, 4),
            Err(ProtocolError::out_of_range(3, 4, 5))
        );
        assert_eq!(decode_uint(&payload, 1, 0), Err(ProtocolError::InvalidWidth(0)));
        assert_eq!(decode_uint(&payload, 1, 5), Err(ProtocolError::InvalidWidth(5)));
    }

    #[test]
    fn test_decode_uint_offset_overflow() {
        assert_eq!(
            decode_uint(&[0x01], usize::MAX, 2),
            Err(ProtocolError::out_of_range(usize::MAX, 2, 1))
        );
    }
}
