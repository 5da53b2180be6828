use std::io::{Read, Write};

use bytes::BytesMut;
use skytraq_transport::Transport;

use crate::codec::Frame;
use crate::error::Result;
use crate::message::MessageId;
use crate::reader::{read_frame_from, scratch_buffer};
use crate::writer::{output_buffer, write_frame_to};

/// Reads and writes frames over one duplex stream.
///
/// Owns the stream, a scratch buffer sized for the largest frame (reused by
/// every read), and an output buffer (reused by every write). One read or one
/// write runs at a time; there is no internal locking.
pub struct FrameStream<T> {
    inner: T,
    scratch: Box<[u8]>,
    out: BytesMut,
}

impl<T> FrameStream<T> {
    /// Wrap a duplex stream.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            scratch: scratch_buffer(),
            out: output_buffer(),
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the stream wrapper and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> FrameStream<T> {
    /// Read the next valid frame (blocking). See [`crate::FrameReader::read_frame`].
    pub fn read_frame(&mut self) -> Result<Frame> {
        read_frame_from(&mut self.inner, &mut self.scratch)
    }
}

impl<T: Write> FrameStream<T> {
    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.id, frame.payload.as_ref())
    }

    /// Encode and send a payload under a message id.
    pub fn send(&mut self, id: MessageId, payload: &[u8]) -> Result<()> {
        write_frame_to(&mut self.inner, &mut self.out, id, payload)
    }
}

impl<T: Transport> FrameStream<T> {
    /// Discard whatever the transport has buffered.
    pub fn clear_buffers(&mut self) -> skytraq_transport::Result<()> {
        self.inner.clear_buffers()
    }

    /// Close the underlying transport.
    pub fn close(&mut self) -> skytraq_transport::Result<()> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use skytraq_transport::{MockTransport, TransportError};

    use super::*;
    use crate::error::FrameError;

    #[test]
    fn request_and_reply_share_one_transport() {
        let mock = MockTransport::with_incoming(&[
            0xA0, 0xA1, 0x00, 0x02, 0x83, 0x02, 0x81, 0x0D, 0x0A,
        ]);
        let mut stream = FrameStream::new(mock.clone());

        stream
            .send(MessageId::QUERY_SOFTWARE_VERSION, &[0x01])
            .unwrap();
        let reply = stream.read_frame().unwrap();

        assert_eq!(reply.id, MessageId::ACK);
        assert_eq!(reply.ack_target(), Some(MessageId::QUERY_SOFTWARE_VERSION));
        assert_eq!(
            mock.written(),
            vec![0xA0, 0xA1, 0x00, 0x02, 0x02, 0x01, 0x03, 0x0D, 0x0A]
        );
    }

    #[test]
    fn scratch_reused_across_reads() {
        let mut bytes = Vec::new();
        let mut writer = crate::writer::FrameWriter::new(&mut bytes);
        writer
            .send(MessageId::EPHEMERIS_DATA, &vec![0x11; 4096])
            .unwrap();
        writer.send(MessageId::ACK, &[0x30]).unwrap();
        drop(writer);

        let mut stream = FrameStream::new(MockTransport::with_incoming(&bytes));
        assert_eq!(stream.read_frame().unwrap().payload.len(), 4096);
        let small = stream.read_frame().unwrap();
        assert_eq!(small.payload.as_ref(), &[0x30]);
        assert!(matches!(
            stream.read_frame().unwrap_err(),
            FrameError::ConnectionClosed
        ));
    }

    #[test]
    fn close_reaches_transport() {
        let mock = MockTransport::new();
        let mut stream = FrameStream::new(mock.clone());
        stream.clear_buffers().unwrap();
        stream.close().unwrap();

        assert!(mock.is_closed());
        assert_eq!(mock.clear_calls(), 1);
        assert!(matches!(stream.close(), Err(TransportError::Closed)));
    }
}
