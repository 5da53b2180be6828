//! Talk to SkyTraq GPS receivers over their binary serial protocol.
//!
//! # Crate Structure
//!
//! - [`transport`]: byte-stream transports (serial port, in-memory mock)
//! - [`frame`]: wire framing with preamble resynchronization and checksums
//! - [`link`]: acknowledged command delivery, telemetry sessions, typed payloads
//!
//! ```no_run
//! # #[cfg(feature = "serial")]
//! # fn main() -> skytraq::link::Result<()> {
//! use skytraq::link::{connect_serial, CancelToken, Handlers, LinkConfig};
//! use skytraq::transport::SerialConfig;
//!
//! let mut link = connect_serial(&SerialConfig::new("/dev/ttyUSB0"), LinkConfig::default())?;
//! let mut handlers = Handlers::new()
//!     .on_software_version(|v| println!("{v}"))
//!     .on_navigation(|nav| println!("{} satellites", nav.satellite_count));
//! link.run(&mut handlers, &CancelToken::new())
//! # }
//! # #[cfg(not(feature = "serial"))]
//! # fn main() {}
//! ```

/// Re-export transport types.
pub mod transport {
    pub use skytraq_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use skytraq_frame::*;
}

/// Re-export link types.
pub mod link {
    pub use skytraq_link::*;
}
