//! Byte-stream transport abstraction for SkyTraq receivers.
//!
//! The receiver talks over a serial link, but nothing above this crate cares:
//! the frame and link layers work against any [`Transport`], which is a
//! blocking duplex byte stream that can also discard driver buffers and close.
//!
//! - [`SerialTransport`] opens a real serial port (`serial` feature, default)
//! - [`MockTransport`] is a scripted in-memory stream for tests (`mock` feature)

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(feature = "serial")]
pub mod serial;

pub use error::{Result, TransportError};
pub use traits::Transport;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
#[cfg(feature = "serial")]
pub use serial::{SerialConfig, SerialTransport, DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};
