//! Outbound envelopes and data-frame encoding.
//!
//! An envelope is what a handler gives to the transport: a serial message
//! class plus the payload, optionally addressed to a node. The transport turns
//! it into a data frame:
//!
//! ```text
//! +-----+-----+------+------+-------------------+----------+
//! | SOF | len | type | func | body[0..n]        | checksum |
//! +-----+-----+------+------+-------------------+----------+
//! ```
//!
//! `len` counts every byte after itself, checksum included. The checksum is
//! `0xFF` XOR every byte from `len` to the end of the body. For node-addressed
//! envelopes the body starts with `node id, payload length`.
//!
//! Callback ids, transmit options and ACK handling belong to the transport.

use bytes::{BufMut, Bytes};

use crate::constants::*;
use crate::error::ProtocolError;
use crate::types::{hex_encode, NodeId, SerialMessageClass};

/// A transport-ready request produced by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEnvelope {
    /// Serial message class the frame is sent with.
    pub message_class: SerialMessageClass,
    /// Target node for node-addressed classes.
    pub node: Option<NodeId>,
    /// Payload bytes.
    pub payload: Bytes,
}

impl OutboundEnvelope {
    /// Create an envelope for a controller-level request.
    pub fn new(message_class: SerialMessageClass, payload: Bytes) -> Self {
        OutboundEnvelope {
            message_class,
            node: None,
            payload,
        }
    }

    /// Create an envelope addressed to a node.
    pub fn to_node(message_class: SerialMessageClass, node: NodeId, payload: Bytes) -> Self {
        OutboundEnvelope {
            message_class,
            node: Some(node),
            payload,
        }
    }

    /// Length of the frame body (everything between the function id and checksum).
    pub fn body_len(&self) -> usize {
        match self.node {
            Some(_) => 2 + self.payload.len(),
            None => self.payload.len(),
        }
    }

    /// Encode the envelope as a request data frame.
    pub fn encode_frame(&self) -> Result<Vec<u8>, ProtocolError> {
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: self.payload.len(),
            });
        }

        // type + func + body + checksum
        let len = 3 + self.body_len();
        let mut buf = Vec::with_capacity(2 + len);
        buf.put_u8(SOF);
        buf.put_u8(len as u8);
        buf.put_u8(FRAME_TYPE_REQUEST);
        buf.put_u8(self.message_class.code());
        if let Some(node) = self.node {
            buf.put_u8(node.0);
            buf.put_u8(self.payload.len() as u8);
        }
        buf.extend_from_slice(&self.payload);
        buf.put_u8(checksum(&buf[1..]));

        log::trace!("encoded {} frame: {}", self.message_class, hex_encode(&buf));
        Ok(buf)
    }
}

/// Compute the frame checksum over `data` (length byte through body).
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(CHECKSUM_SEED, |acc, byte| acc ^ byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_api_query_frame() {
        let envelope =
            OutboundEnvelope::new(SerialMessageClass::SetupApi, Bytes::from_static(&[0x01]));
        let frame = envelope.encode_frame().expect("should encode");
        assert_eq!(frame, vec![0x01, 0x04, 0x00, 0x0B, 0x01, 0xF1]);
    }

    #[test]
    fn test_node_addressed_frame() {
        let envelope = OutboundEnvelope::to_node(
            SerialMessageClass::SendData,
            NodeId(5),
            Bytes::from_static(&[0x2C, 0x02, 0x07]),
        );
        let frame = envelope.encode_frame().expect("should encode");

        assert_eq!(frame[0], SOF);
        assert_eq!(frame[1] as usize, frame.len() - 2);
        assert_eq!(frame[2], FRAME_TYPE_REQUEST);
        assert_eq!(frame[3], FUNC_SEND_DATA);
        assert_eq!(frame[4], 5); // node
        assert_eq!(frame[5], 3); // payload length
        assert_eq!(&frame[6..9], &[0x2C, 0x02, 0x07]);

        // XOR of everything after SOF, checksum included, comes back to the seed
        let folded = frame[1..].iter().fold(0u8, |acc, b| acc ^ b);
        assert_eq!(folded, CHECKSUM_SEED);
    }

    #[test]
    fn test_payload_too_large() {
        let envelope = OutboundEnvelope::new(
            SerialMessageClass::SetupApi,
            Bytes::from(vec![0u8; MAX_PAYLOAD_SIZE + 1]),
        );
        assert_eq!(
            envelope.encode_frame(),
            Err(ProtocolError::PayloadTooLarge {
                max: MAX_PAYLOAD_SIZE,
                actual: MAX_PAYLOAD_SIZE + 1
            })
        );
    }
}
