use std::fmt;
use std::io;

use skytraq_frame::FrameError;
use skytraq_link::LinkError;
use skytraq_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

fn io_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::InvalidData => DATA_INVALID,
        _ => TRANSPORT_ERROR,
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(io_code(&err), format!("{context}: {err}"))
}

fn transport_code(err: &TransportError) -> i32 {
    match err {
        TransportError::Open { source, .. } | TransportError::Io(source) => io_code(source),
        TransportError::Closed => TRANSPORT_ERROR,
    }
}

fn frame_code(err: &FrameError) -> i32 {
    match err {
        FrameError::Io(source) => io_code(source),
        FrameError::ConnectionClosed => FAILURE,
        FrameError::ShortWrite { .. } => TRANSPORT_ERROR,
        FrameError::PayloadTooLarge { .. } => DATA_INVALID,
        err if err.is_framing() => DATA_INVALID,
        _ => INTERNAL,
    }
}

fn link_code(err: &LinkError) -> i32 {
    match err {
        LinkError::Transport(err) => transport_code(err),
        LinkError::Frame(err) => frame_code(err),
        LinkError::Nack { .. } => FAILURE,
        LinkError::TooManyIrrelevant { .. } => FAILURE,
        LinkError::ExceededRetries { source, .. } => link_code(source),
        LinkError::Conversion(_) => DATA_INVALID,
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    CliError::new(frame_code(&err), format!("{context}: {err}"))
}

/// Exhausted retries take the code of the last attempt's failure.
pub fn link_error(context: &str, err: LinkError) -> CliError {
    CliError::new(link_code(&err), format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use skytraq_frame::MessageId;

    use super::*;

    #[test]
    fn retries_take_last_cause_code() {
        let timed_out = FrameError::Io(io::Error::from(io::ErrorKind::TimedOut));
        let err = LinkError::ExceededRetries {
            attempts: 3,
            source: Box::new(LinkError::Frame(timed_out)),
        };
        let cli = link_error("send failed", err);
        assert_eq!(cli.code, TIMEOUT);
        assert!(cli.message.starts_with("send failed: exceeded retries"));
    }

    #[test]
    fn unrelated_traffic_is_a_failure() {
        let err = LinkError::TooManyIrrelevant {
            id: MessageId::QUERY_SOFTWARE_VERSION,
            count: 6,
        };
        assert_eq!(link_error("send failed", err).code, FAILURE);

        let irrelevant = LinkError::TooManyIrrelevant {
            id: MessageId::QUERY_SOFTWARE_VERSION,
            count: 6,
        };
        let wrapped = LinkError::ExceededRetries {
            attempts: 3,
            source: Box::new(irrelevant),
        };
        assert_eq!(link_error("send failed", wrapped).code, FAILURE);
    }

    #[test]
    fn codes_by_kind() {
        let nack = LinkError::Nack {
            acked: MessageId(2),
            sent: MessageId(2),
        };
        assert_eq!(link_error("x", nack).code, FAILURE);
        assert_eq!(frame_error("x", FrameError::EmptyFrame).code, DATA_INVALID);

        let closed = LinkError::Transport(TransportError::Closed);
        assert_eq!(link_error("x", closed).code, TRANSPORT_ERROR);

        let missing = io::Error::from(io::ErrorKind::NotFound);
        assert_eq!(io_error("x", missing).code, TRANSPORT_ERROR);
    }
}
