use skytraq_frame::{Frame, FrameStream};
use skytraq_transport::Transport;
use tracing::info;

use crate::config::LinkConfig;
use crate::error::Result;

/// A connection to one receiver over one transport.
///
/// Lives for one transport session. Reads and writes are serialized by
/// `&mut self`; share a link between threads only behind a mutex.
pub struct Link<T> {
    pub(crate) stream: FrameStream<T>,
    pub(crate) config: LinkConfig,
}

impl<T: Transport> Link<T> {
    /// Wrap an already opened transport. Nothing is sent.
    pub fn new(transport: T, config: LinkConfig) -> Self {
        Self {
            stream: FrameStream::new(transport),
            config,
        }
    }

    /// Delivery policy in effect.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Read the next valid frame, whatever its kind.
    pub fn read_frame(&mut self) -> Result<Frame> {
        Ok(self.stream.read_frame()?)
    }

    /// Encode and write one frame without waiting for an acknowledgement.
    pub fn send_unconfirmed(&mut self, frame: &Frame) -> Result<()> {
        info!(id = %frame.id, payload = ?frame.payload.as_ref(), "sending message");
        Ok(self.stream.write_frame(frame)?)
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        self.stream.get_ref()
    }

    /// Close the transport. A second close fails.
    pub fn close(&mut self) -> Result<()> {
        info!(
            transport = self.stream.get_ref().transport_name(),
            "closing link"
        );
        Ok(self.stream.close()?)
    }
}

impl<T> std::fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use skytraq_frame::{encode_frame, FrameError, MessageId};
    use skytraq_transport::{MockTransport, TransportError};

    use super::*;
    use crate::error::LinkError;

    fn wire(id: MessageId, payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(id, payload, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn reads_any_frame() {
        let mock = MockTransport::with_incoming(&wire(MessageId::POWER_MODE, &[0x00]));
        let mut link = Link::new(mock, LinkConfig::default());

        let frame = link.read_frame().unwrap();
        assert_eq!(frame.id, MessageId::POWER_MODE);
        assert!(matches!(
            link.read_frame().unwrap_err(),
            LinkError::Frame(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn unconfirmed_send_writes_once() {
        let mock = MockTransport::new();
        let mut link = Link::new(mock.clone(), LinkConfig::default());

        let restart = Frame::new(MessageId::SYSTEM_RESTART, vec![0x00]);
        link.send_unconfirmed(&restart).unwrap();
        assert_eq!(mock.written(), wire(MessageId::SYSTEM_RESTART, &[0x00]));
    }

    #[test]
    fn close_then_close_again() {
        let mock = MockTransport::new();
        let mut link = Link::new(mock.clone(), LinkConfig::default());

        link.close().unwrap();
        assert!(mock.is_closed());
        assert!(matches!(
            link.close().unwrap_err(),
            LinkError::Transport(TransportError::Closed)
        ));
    }
}
