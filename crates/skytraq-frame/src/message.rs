//! Message identifiers.
//!
//! Ids below 0x80 are commands sent to the receiver; 0x80 and above are
//! responses and telemetry emitted by it.

use std::fmt;

/// One-byte message identifier, the first byte of every frame body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u8);

impl MessageId {
    /// Restart the receiver.
    pub const SYSTEM_RESTART: MessageId = MessageId(0x01);
    /// Ask for the software version.
    pub const QUERY_SOFTWARE_VERSION: MessageId = MessageId(0x02);
    /// Ask for the software CRC.
    pub const QUERY_SOFTWARE_CRC: MessageId = MessageId(0x03);
    /// Ask for the position update rate.
    pub const QUERY_POSITION_RATE: MessageId = MessageId(0x10);
    /// Ask for the power mode.
    pub const QUERY_POWER_MODE: MessageId = MessageId(0x15);
    /// Ask for ephemeris data.
    pub const GET_EPHEMERIS: MessageId = MessageId(0x30);

    pub const SOFTWARE_VERSION: MessageId = MessageId(0x80);
    pub const SOFTWARE_CRC: MessageId = MessageId(0x81);
    /// Positive acknowledgement; payload byte 0 is the acknowledged id.
    pub const ACK: MessageId = MessageId(0x83);
    /// Negative acknowledgement; payload byte 0 is the rejected id.
    pub const NACK: MessageId = MessageId(0x84);
    pub const POSITION_RATE: MessageId = MessageId(0x86);
    /// Navigation solution telemetry.
    pub const NAV_DATA: MessageId = MessageId(0xA8);
    pub const EPHEMERIS_DATA: MessageId = MessageId(0xB1);
    pub const POWER_MODE: MessageId = MessageId(0xB9);

    /// Returns a human-readable name for the id.
    pub fn name(self) -> &'static str {
        match self {
            Self::SYSTEM_RESTART => "SYSTEM_RESTART",
            Self::QUERY_SOFTWARE_VERSION => "QUERY_SOFTWARE_VERSION",
            Self::QUERY_SOFTWARE_CRC => "QUERY_SOFTWARE_CRC",
            Self::QUERY_POSITION_RATE => "QUERY_POSITION_RATE",
            Self::QUERY_POWER_MODE => "QUERY_POWER_MODE",
            Self::GET_EPHEMERIS => "GET_EPHEMERIS",
            Self::SOFTWARE_VERSION => "SOFTWARE_VERSION",
            Self::SOFTWARE_CRC => "SOFTWARE_CRC",
            Self::ACK => "ACK",
            Self::NACK => "NACK",
            Self::POSITION_RATE => "POSITION_RATE",
            Self::NAV_DATA => "NAV_DATA",
            Self::EPHEMERIS_DATA => "EPHEMERIS_DATA",
            Self::POWER_MODE => "POWER_MODE",
            MessageId(id) if id < 0x80 => "COMMAND",
            _ => "RESPONSE",
        }
    }

    /// Returns true for ACK and NACK.
    pub fn is_acknowledgement(self) -> bool {
        self == Self::ACK || self == Self::NACK
    }
}

impl From<u8> for MessageId {
    fn from(id: u8) -> Self {
        MessageId(id)
    }
}

impl From<MessageId> for u8 {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
