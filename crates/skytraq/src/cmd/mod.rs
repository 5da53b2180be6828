use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use skytraq_frame::MessageId;
use skytraq_link::{LinkConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_IRRELEVANT_FRAMES};
use skytraq_transport::{SerialConfig, DEFAULT_BAUD_RATE};

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to a receiver and print its telemetry.
    Listen(ListenArgs),
    /// Send one command and wait for the receiver's ACK.
    Send(SendArgs),
    /// Decode frames from a captured byte stream.
    Decode(DecodeArgs),
    /// Print the wire encoding of a message.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SerialArgs {
    /// Serial port (e.g. /dev/ttyUSB0, COM3).
    #[arg(env = "SKYTRAQ_PORT")]
    pub port: String,
    /// Line rate.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Read timeout (e.g. 10s, 500ms). Bounds how long Ctrl-C can take.
    #[arg(long, default_value = "10s")]
    pub read_timeout: String,
}

impl SerialArgs {
    pub fn to_config(&self) -> CliResult<SerialConfig> {
        Ok(SerialConfig::new(self.port.clone())
            .baud_rate(self.baud)
            .read_timeout(parse_duration(&self.read_timeout)?))
    }
}

#[derive(Args, Debug)]
pub struct DeliveryArgs {
    /// Total writes of a command before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub attempts: u32,
    /// Unrelated frames tolerated while waiting for an ACK.
    #[arg(long, default_value_t = DEFAULT_MAX_IRRELEVANT_FRAMES)]
    pub max_irrelevant: usize,
}

impl DeliveryArgs {
    pub fn to_config(&self) -> LinkConfig {
        LinkConfig {
            max_attempts: self.attempts,
            max_irrelevant_frames: self.max_irrelevant,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    #[command(flatten)]
    pub serial: SerialArgs,
    #[command(flatten)]
    pub delivery: DeliveryArgs,
    /// Exit after printing N records.
    #[arg(long)]
    pub count: Option<usize>,
    /// Also print frames without a typed decoder.
    #[arg(long)]
    pub all: bool,
    /// Reopen the port after a failure instead of exiting.
    #[arg(long)]
    pub reconnect: bool,
    /// Pause between reconnect attempts (e.g. 1s, 250ms).
    #[arg(long, default_value = "1s")]
    pub reconnect_delay: String,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub serial: SerialArgs,
    #[command(flatten)]
    pub delivery: DeliveryArgs,
    /// Message id, decimal or 0x-prefixed hex.
    #[arg(long)]
    pub id: String,
    /// Payload as hex (whitespace allowed).
    #[arg(long, default_value = "")]
    pub data: String,
    /// Write once without waiting for an ACK.
    #[arg(long)]
    pub no_ack: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file of raw receiver output.
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message id, decimal or 0x-prefixed hex.
    #[arg(long)]
    pub id: String,
    /// Payload as hex (whitespace allowed).
    #[arg(long, default_value = "")]
    pub data: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_message_id(input: &str) -> CliResult<MessageId> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => input.parse(),
    };
    parsed
        .map(MessageId)
        .map_err(|_| CliError::usage(format!("invalid message id: {input}")))
}

pub fn parse_payload(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).map_err(|err| CliError::usage(format!("--data is not valid hex: {err}")))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::usage(format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::usage("duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_ids() {
        assert_eq!(parse_message_id("0x02").unwrap(), MessageId(2));
        assert_eq!(parse_message_id("0XA8").unwrap(), MessageId::NAV_DATA);
        assert_eq!(parse_message_id("131").unwrap(), MessageId::ACK);
        assert!(parse_message_id("256").is_err());
        assert!(parse_message_id("0xZZ").is_err());
    }

    #[test]
    fn payloads() {
        assert_eq!(parse_payload("").unwrap(), Vec::<u8>::new());
        assert_eq!(parse_payload("0a FF").unwrap(), vec![0x0A, 0xFF]);
        assert_eq!(parse_payload("abc").unwrap_err().code, crate::exit::USAGE);
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("15ms").unwrap(), Duration::from_millis(15));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
    }
}
