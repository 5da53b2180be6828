use crate::message::MessageId;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended (a read returned zero bytes).
    #[error("connection closed (end of stream)")]
    ConnectionClosed,

    /// The transport accepted fewer bytes than were written.
    #[error("short write ({written} of {expected} bytes)")]
    ShortWrite { written: usize, expected: usize },

    /// The payload does not fit the 16-bit length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The frame body did not end with `0x0D 0x0A`.
    #[error("could not find end of frame marker (found {found:02X?})")]
    MissingEndMarker { found: [u8; 2] },

    /// The checksum byte did not match the body.
    #[error("expected checksum {expected:#04x} but found {found:#04x} for message {id}")]
    ChecksumMismatch {
        id: MessageId,
        expected: u8,
        found: u8,
    },

    /// The length field was zero, so there is no message id.
    #[error("frame length field is zero")]
    EmptyFrame,
}

impl FrameError {
    /// True for noise or a single corrupted frame.
    ///
    /// The stream itself is still usable: reading again resynchronizes on the
    /// next preamble. I/O failures and end-of-stream are not framing errors.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            FrameError::MissingEndMarker { .. }
                | FrameError::ChecksumMismatch { .. }
                | FrameError::EmptyFrame
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
