//! Typed views of response payloads.
//!
//! Each structure is a projection of fixed byte offsets. Values are copied
//! out, so they can outlive the frame they came from.

use std::fmt;

use serde::Serialize;
use skytraq_frame::Frame;
use tracing::error;

use crate::error::ConversionError;

/// A `major.minor.patch` triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    pub fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Payload of a [`skytraq_frame::MessageId::SOFTWARE_VERSION`] response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoftwareVersion {
    pub kernel: Version,
    pub odm: Version,
    /// Revision date as year.month.day.
    pub revision: Version,
}

impl SoftwareVersion {
    pub const PAYLOAD_LEN: usize = 13;

    /// Project a 13-byte payload.
    ///
    /// Bytes 2..=4 hold the kernel version, 6..=8 the ODM version and
    /// 10..=12 the revision date with the year stored as an offset from 2000.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ConversionError> {
        expect_len("SoftwareVersion", payload, Self::PAYLOAD_LEN)?;
        let triplet = |at: usize| {
            Version::new(
                u16::from(payload[at]),
                u16::from(payload[at + 1]),
                u16::from(payload[at + 2]),
            )
        };
        let mut revision = triplet(10);
        revision.major += 2000;

        Ok(Self {
            kernel: triplet(2),
            odm: triplet(6),
            revision,
        })
    }
}

impl TryFrom<&Frame> for SoftwareVersion {
    type Error = ConversionError;

    fn try_from(frame: &Frame) -> Result<Self, Self::Error> {
        Self::from_payload(&frame.payload)
    }
}

impl fmt::Display for SoftwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GPS kernel version: {} - ODM version: {} - Revision: {}",
            self.kernel, self.odm, self.revision
        )
    }
}

/// Quality of the position fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixMode {
    None,
    TwoD,
    ThreeD,
    ThreeDDgnss,
    /// A mode byte this crate does not know.
    Unknown(u8),
}

impl From<u8> for FixMode {
    fn from(mode: u8) -> Self {
        match mode {
            0 => FixMode::None,
            1 => FixMode::TwoD,
            2 => FixMode::ThreeD,
            3 => FixMode::ThreeDDgnss,
            other => FixMode::Unknown(other),
        }
    }
}

impl fmt::Display for FixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixMode::None => f.write_str("none"),
            FixMode::TwoD => f.write_str("2D"),
            FixMode::ThreeD => f.write_str("3D"),
            FixMode::ThreeDDgnss => f.write_str("3D+DGNSS"),
            FixMode::Unknown(mode) => write!(f, "unknown({mode})"),
        }
    }
}

/// Payload of a [`skytraq_frame::MessageId::NAV_DATA`] message.
///
/// Raw device units; no scaling is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavigationSolution {
    pub fix: FixMode,
    pub satellite_count: u8,
    pub latitude: i32,
    pub longitude: i32,
    pub altitude: i32,
    pub hdop: u16,
    pub vx: i32,
    pub vy: i32,
    pub vz: i32,
}

impl NavigationSolution {
    pub const PAYLOAD_LEN: usize = 58;

    /// Project a 58-byte payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ConversionError> {
        expect_len("NavigationSolution", payload, Self::PAYLOAD_LEN)?;
        Ok(Self {
            fix: FixMode::from(payload[0]),
            satellite_count: payload[2],
            latitude: be_i32(payload, 8),
            longitude: be_i32(payload, 12),
            altitude: be_i32(payload, 20),
            hdop: u16::from_be_bytes([payload[28], payload[29]]),
            vx: be_i32(payload, 46),
            vy: be_i32(payload, 50),
            vz: be_i32(payload, 54),
        })
    }
}

impl TryFrom<&Frame> for NavigationSolution {
    type Error = ConversionError;

    fn try_from(frame: &Frame) -> Result<Self, Self::Error> {
        Self::from_payload(&frame.payload)
    }
}

fn expect_len(
    structure: &'static str,
    payload: &[u8],
    expected: usize,
) -> Result<(), ConversionError> {
    if payload.len() != expected {
        error!(
            structure,
            length = payload.len(),
            expected_len = expected,
            "unexpected payload length"
        );
        return Err(ConversionError::LengthMismatch {
            structure,
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}

fn be_i32(payload: &[u8], at: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&payload[at..at + 4]);
    i32::from_be_bytes(bytes)
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const VERSION_DATA: [u8; 13] = [0, 0, 1, 2, 3, 0, 4, 5, 6, 0, 7, 8, 9];

    /// 3D fix, 3 satellites, lat 1, lon 2, alt 3, HDOP 4, velocity (5, 6, 7).
    pub fn nav_data() -> Vec<u8> {
        let mut buf = vec![2, 0, 3, 0, 0, 0, 0, 0];
        for v in [1u32, 2, 0, 3, 0] {
            buf.extend_from_slice(&v.to_be_bytes());
        }
        buf.extend_from_slice(&4u16.to_be_bytes());
        for v in [0u32, 0, 0, 0, 5, 6, 7] {
            buf.extend_from_slice(&v.to_be_bytes());
        }
        buf
    }
}
