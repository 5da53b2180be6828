use std::io::{Read, Write};

use crate::error::Result;

/// An opened duplex byte stream to a receiver.
///
/// `Read` may return fewer bytes than requested; a zero-length read with no
/// error means the stream has ended. `Write::flush` pushes pending output to
/// the device. Callers serialize all reads and writes on one transport.
pub trait Transport: Read + Write + Send {
    /// Discard bytes buffered by the driver in both directions.
    ///
    /// Called once after opening so that stale telemetry is not mistaken for
    /// a reply. Transports without driver buffers keep the default no-op.
    fn clear_buffers(&mut self) -> Result<()> {
        Ok(())
    }

    /// Close the transport. Closing an already closed transport is an error.
    fn close(&mut self) -> Result<()>;

    /// Transport name for diagnostics.
    fn transport_name(&self) -> &'static str;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn clear_buffers(&mut self) -> Result<()> {
        (**self).clear_buffers()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }
}
