use skytraq_frame::{Frame, MessageId};
use skytraq_transport::Transport;
#[cfg(feature = "serial")]
use skytraq_transport::{SerialConfig, SerialTransport};
use tracing::{debug, info};

use crate::config::LinkConfig;
use crate::error::Result;
use crate::link::Link;

/// Payload of the version query sent while connecting: system code.
const SYSTEM_CODE: u8 = 0x01;

/// Bring up a link over an already opened transport.
///
/// Stale buffered bytes are discarded, then a software version query is sent
/// reliably. The query's acknowledgement proves the receiver is talking; the
/// version response itself arrives later and is left for the caller to read.
pub fn connect<T: Transport>(transport: T, config: LinkConfig) -> Result<Link<T>> {
    let mut link = Link::new(transport, config);
    link.stream.clear_buffers()?;
    debug!("cleared transport buffers");

    link.send(&Frame::new(
        MessageId::QUERY_SOFTWARE_VERSION,
        vec![SYSTEM_CODE],
    ))?;
    info!(
        transport = link.transport().transport_name(),
        "receiver acknowledged"
    );
    Ok(link)
}

/// Open a serial port and connect over it.
#[cfg(feature = "serial")]
pub fn connect_serial(serial: &SerialConfig, config: LinkConfig) -> Result<Link<SerialTransport>> {
    info!(port = %serial.path, baud_rate = serial.baud_rate, "opening serial port");
    let transport = SerialTransport::open(serial)?;
    connect(transport, config)
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use skytraq_frame::{encode_frame, FrameError};
    use skytraq_transport::MockTransport;

    use super::*;
    use crate::error::LinkError;
    use crate::payload::fixtures::VERSION_DATA;
    use crate::payload::SoftwareVersion;

    fn wire(id: MessageId, payload: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(id, payload, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn connect_then_close() {
        let mut incoming = wire(MessageId::ACK, &[0x02]);
        incoming.extend(wire(MessageId::SOFTWARE_VERSION, &VERSION_DATA));
        let mock = MockTransport::with_incoming(&incoming);

        let mut link = connect(mock.clone(), LinkConfig::default()).unwrap();
        assert_eq!(mock.clear_calls(), 1);
        assert_eq!(
            mock.written(),
            vec![0xA0, 0xA1, 0x00, 0x02, 0x02, 0x01, 0x03, 0x0D, 0x0A]
        );

        let reply = link.read_frame().unwrap();
        let version = SoftwareVersion::try_from(&reply).unwrap();
        assert_eq!(version.odm.to_string(), "4.5.6");

        link.close().unwrap();
        assert!(mock.is_closed());
    }

    #[test]
    fn connect_without_receiver() {
        let mock = MockTransport::new();
        let err = connect(mock.clone(), LinkConfig::default()).unwrap_err();

        assert!(matches!(
            err.last_cause(),
            LinkError::Frame(FrameError::ConnectionClosed)
        ));
        assert_eq!(mock.write_calls(), 3);
    }

    #[cfg(feature = "serial")]
    #[test]
    fn connect_serial_missing_port() {
        let serial = SerialConfig::new("/dev/skytraq-does-not-exist");
        let err = connect_serial(&serial, LinkConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LinkError::Transport(skytraq_transport::TransportError::Open { .. })
        ));
    }
}
