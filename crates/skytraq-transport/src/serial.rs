use std::io::{Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Line rate the receivers are configured for out of the box.
pub const DEFAULT_BAUD_RATE: u32 = 230_400;

/// The receiver can stay silent between telemetry bursts, so reads wait a while.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Serial port settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port path or name (e.g. `/dev/ttyUSB0`, `COM3`).
    pub path: String,
    /// Baud rate. Default: 230400.
    pub baud_rate: u32,
    /// Read timeout; bounds how long a blocked read (and cancellation) can take.
    pub read_timeout: Duration,
}

impl SerialConfig {
    /// Settings for `path` with default baud rate and timeout.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Set the baud rate.
    #[must_use]
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

/// A receiver attached to a local serial port.
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    path: String,
}

impl SerialTransport {
    /// Open the port described by `config` (8N1, no flow control).
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.path, config.baud_rate)
            .timeout(config.read_timeout)
            .open()
            .map_err(|e| TransportError::Open {
                port: config.path.clone(),
                source: e.into(),
            })?;

        info!(
            path = %config.path,
            baud_rate = config.baud_rate,
            "opened serial port"
        );

        Ok(Self {
            port: Some(port),
            path: config.path.clone(),
        })
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(TransportError::Closed)
    }
}

fn not_connected() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::NotConnected, "serial port closed")
}

impl Read for SerialTransport {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.port.as_mut() {
            Some(port) => port.read(buf),
            None => Err(not_connected()),
        }
    }
}

impl Write for SerialTransport {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.port.as_mut() {
            Some(port) => port.write(buf),
            None => Err(not_connected()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.port.as_mut() {
            Some(port) => port.flush(),
            None => Err(not_connected()),
        }
    }
}

impl Transport for SerialTransport {
    fn clear_buffers(&mut self) -> Result<()> {
        let port = self.port_mut()?;
        port.clear(ClearBuffer::All)
            .map_err(|e| TransportError::Io(e.into()))?;
        debug!("cleared serial buffers");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        match self.port.take() {
            Some(port) => {
                drop(port);
                debug!(path = %self.path, "closed serial port");
                Ok(())
            }
            None => Err(TransportError::Closed),
        }
    }

    fn transport_name(&self) -> &'static str {
        "serial"
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .field("open", &self.port.is_some())
            .finish()
    }
}
