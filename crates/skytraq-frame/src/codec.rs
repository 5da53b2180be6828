use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::message::MessageId;

/// Start-of-frame marker.
pub const PREAMBLE: [u8; 2] = [0xA0, 0xA1];

/// End-of-frame marker.
pub const END_MARKER: [u8; 2] = [0x0D, 0x0A];

/// Frame header: preamble (2) + body length (2) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Frame trailer: checksum (1) + end marker (2) = 3 bytes.
pub const TRAILER_SIZE: usize = 3;

/// Largest body (message id + payload) the 16-bit length field can describe.
pub const MAX_BODY_SIZE: usize = u16::MAX as usize;

/// Largest payload that still leaves room for the message id.
pub const MAX_PAYLOAD: usize = MAX_BODY_SIZE - 1;

/// A validated protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The message identifier.
    pub id: MessageId,
    /// The message payload (everything after the id).
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(id: impl Into<MessageId>, payload: impl Into<Bytes>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + id + payload + trailer).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + 1 + self.payload.len() + TRAILER_SIZE
    }

    /// The checksum this frame carries on the wire.
    pub fn checksum(&self) -> u8 {
        checksum(self.id, &self.payload)
    }

    /// The id an ACK or NACK refers to: the first payload byte.
    ///
    /// Returns `None` for an empty payload.
    pub fn ack_target(&self) -> Option<MessageId> {
        self.payload.first().copied().map(MessageId)
    }
}

/// XOR of the message id and every payload byte.
pub fn checksum(id: MessageId, payload: &[u8]) -> u8 {
    payload.iter().fold(id.0, |cs, b| cs ^ b)
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬──────────┬──────┬─────────────┬──────────┬───────────┐
/// │ Preamble  │ Length   │ Id   │ Payload     │ Checksum │ End       │
/// │ 0xA0 0xA1 │ (2B BE)  │ (1B) │ (Length-1)  │ (1B XOR) │ 0x0D 0x0A │
/// └───────────┴──────────┴──────┴─────────────┴──────────┴───────────┘
/// ```
pub fn encode_frame(id: MessageId, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(HEADER_SIZE + 1 + payload.len() + TRAILER_SIZE);
    dst.put_slice(&PREAMBLE);
    dst.put_u16((payload.len() + 1) as u16);
    dst.put_u8(id.0);
    dst.put_slice(payload);
    dst.put_u8(checksum(id, payload));
    dst.put_slice(&END_MARKER);
    Ok(())
}

/// Validate a frame body read from the wire.
///
/// `body` holds the id, payload, checksum and end marker: exactly the
/// `length + 3` bytes that follow the header.
pub(crate) fn parse_body(body: &[u8]) -> Result<Frame> {
    if body.len() <= TRAILER_SIZE {
        return Err(FrameError::EmptyFrame);
    }
    let size = body.len() - TRAILER_SIZE;

    let marker = [body[size + 1], body[size + 2]];
    if marker != END_MARKER {
        return Err(FrameError::MissingEndMarker { found: marker });
    }

    let id = MessageId(body[0]);
    let payload = &body[1..size];
    let expected = checksum(id, payload);
    let found = body[size];
    if expected != found {
        return Err(FrameError::ChecksumMismatch {
            id,
            expected,
            found,
        });
    }

    Ok(Frame {
        id,
        payload: Bytes::copy_from_slice(payload),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(wire: &[u8]) -> &[u8] {
        &wire[HEADER_SIZE..]
    }

    #[test]
    fn test_encode_layout() {
        let mut buf = BytesMut::new();
        encode_frame(MessageId::QUERY_SOFTWARE_VERSION, &[0x01], &mut buf).unwrap();

        assert_eq!(
            buf.as_ref(),
            &[0xA0, 0xA1, 0x00, 0x02, 0x02, 0x01, 0x03, 0x0D, 0x0A]
        );
    }

    #[test]
    fn test_encode_parse_roundtrip() {
        let mut buf = BytesMut::new();
        let payload = [0x00, 0x00, 0x01, 0x02, 0x03, 0x00, 0x04];
        encode_frame(MessageId::SOFTWARE_VERSION, &payload, &mut buf).unwrap();

        let frame = parse_body(body_of(&buf)).unwrap();
        assert_eq!(frame.id, MessageId::SOFTWARE_VERSION);
        assert_eq!(frame.payload.as_ref(), &payload);
        assert_eq!(frame.wire_size(), buf.len());
    }

    #[test]
    fn test_checksum_is_xor_of_body() {
        assert_eq!(checksum(MessageId(0x83), &[0x02]), 0x81);
        assert_eq!(checksum(MessageId(0x55), &[]), 0x55);
        assert_eq!(checksum(MessageId(0x01), &[0x01, 0xFF, 0x0F]), 0xF0);
    }

    #[test]
    fn test_every_checksum_bit_flip_rejected() {
        let mut buf = BytesMut::new();
        encode_frame(MessageId::NAV_DATA, b"telemetry", &mut buf).unwrap();
        let cs_index = buf.len() - TRAILER_SIZE;

        for bit in 0..8 {
            let mut corrupted = buf.to_vec();
            corrupted[cs_index] ^= 1 << bit;
            let err = parse_body(body_of(&corrupted)).unwrap_err();
            assert!(matches!(err, FrameError::ChecksumMismatch { .. }));
        }
    }

    #[test]
    fn test_parse_missing_end_marker() {
        let body = [0x83, 0x02, 0x81, 0x0D, 0x0B];
        let err = parse_body(&body).unwrap_err();
        assert!(matches!(
            err,
            FrameError::MissingEndMarker {
                found: [0x0D, 0x0B]
            }
        ));
    }

    #[test]
    fn test_parse_empty_body() {
        let err = parse_body(&[0x00, 0x0D, 0x0A]).unwrap_err();
        assert!(matches!(err, FrameError::EmptyFrame));
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = BytesMut::new();
        encode_frame(MessageId::ACK, b"", &mut buf).unwrap();

        let frame = parse_body(body_of(&buf)).unwrap();
        assert_eq!(frame.id, MessageId::ACK);
        assert!(frame.payload.is_empty());
        assert_eq!(frame.ack_target(), None);
    }

    #[test]
    fn test_max_payload_fits_length_field() {
        let payload = vec![0x5A; MAX_PAYLOAD];
        let mut buf = BytesMut::new();
        encode_frame(MessageId(0x64), &payload, &mut buf).unwrap();
        assert_eq!(&buf[2..4], &[0xFF, 0xFF]);

        let frame = parse_body(body_of(&buf)).unwrap();
        assert_eq!(frame.payload.len(), MAX_PAYLOAD);
    }

    #[test]
    fn test_payload_too_large() {
        let payload = vec![0u8; MAX_PAYLOAD + 1];
        let mut buf = BytesMut::new();
        let err = encode_frame(MessageId(0x64), &payload, &mut buf).unwrap_err();
        match err {
            FrameError::PayloadTooLarge { size, max } => {
                assert_eq!(size, MAX_PAYLOAD + 1);
                assert_eq!(max, MAX_PAYLOAD);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn test_ack_target() {
        let frame = Frame::new(MessageId::ACK, vec![0x02]);
        assert_eq!(frame.ack_target(), Some(MessageId::QUERY_SOFTWARE_VERSION));
        assert_eq!(frame.checksum(), 0x81);
    }
}
