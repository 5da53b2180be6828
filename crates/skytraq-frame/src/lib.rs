//! Message framing for the SkyTraq binary protocol.
//!
//! Every message on the wire is framed as:
//! - A 2-byte preamble (`0xA0 0xA1`) for stream synchronization
//! - A 2-byte big-endian body length (message id + payload)
//! - The message id and payload
//! - An XOR checksum over the body and a `0x0D 0x0A` end marker
//!
//! The decoder assumes nothing about where it starts in the stream: it
//! resynchronizes on the preamble, dropping noise and partial frames.

pub mod codec;
pub mod error;
pub mod message;
pub mod reader;
pub mod stream;
pub mod writer;

pub use codec::{
    checksum, encode_frame, Frame, END_MARKER, HEADER_SIZE, MAX_BODY_SIZE, MAX_PAYLOAD, PREAMBLE,
    TRAILER_SIZE,
};
pub use error::{FrameError, Result};
pub use message::MessageId;
pub use reader::FrameReader;
pub use stream::FrameStream;
pub use writer::FrameWriter;
