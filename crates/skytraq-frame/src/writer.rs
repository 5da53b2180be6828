use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::debug;

use crate::codec::{encode_frame, Frame, HEADER_SIZE, TRAILER_SIZE};
use crate::error::{FrameError, Result};
use crate::message::MessageId;

/// Writes complete frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: output_buffer(),
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.id, frame.payload.as_ref())
    }

    /// Encode and send a payload under a message id.
    pub fn send(&mut self, id: MessageId, payload: &[u8]) -> Result<()> {
        write_frame_to(&mut self.inner, &mut self.buf, id, payload)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

pub(crate) fn output_buffer() -> BytesMut {
    BytesMut::with_capacity(HEADER_SIZE + 64 + TRAILER_SIZE)
}

/// Encode into `buf` and hand the whole wire image to the stream.
///
/// A write that accepts fewer bytes than offered is an error, not a partial
/// success: the receiver would see a torn frame.
pub(crate) fn write_frame_to<W: Write + ?Sized>(
    inner: &mut W,
    buf: &mut BytesMut,
    id: MessageId,
    payload: &[u8],
) -> Result<()> {
    buf.clear();
    encode_frame(id, payload, buf)?;

    debug!(id = %id, name = id.name(), payload_size = payload.len(), "sending frame");
    loop {
        match inner.write(buf) {
            Ok(n) if n == buf.len() => break,
            Ok(n) => {
                return Err(FrameError::ShortWrite {
                    written: n,
                    expected: buf.len(),
                })
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }

    loop {
        match inner.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
}
