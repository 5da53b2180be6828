//! Reliable command delivery and telemetry sessions for SkyTraq receivers.
//!
//! A [`Link`] owns one transport. Commands go out through [`Link::send`],
//! which waits for the receiver's ACK and retries on NACK or silence.
//! Telemetry comes in through [`Link::run`], which decodes frames and hands
//! typed payloads to caller-supplied [`Handlers`].

pub mod config;
pub mod connector;
pub mod error;
pub mod link;
pub mod payload;
pub mod reliable;
pub mod session;

pub use config::{LinkConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_IRRELEVANT_FRAMES};
pub use connector::connect;
#[cfg(feature = "serial")]
pub use connector::connect_serial;
pub use error::{ConversionError, ErrorKind, LinkError, Result};
pub use link::Link;
pub use payload::{FixMode, NavigationSolution, SoftwareVersion, Version};
pub use session::{CancelToken, Handlers};
