use skytraq_frame::{FrameError, MessageId};

/// A correctly framed message whose payload does not match its fixed layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("{structure} conversion requires {expected} bytes but received {actual}")]
    LengthMismatch {
        structure: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Errors that can occur in link operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Transport-level error (open, clear, close).
    #[error("transport error: {0}")]
    Transport(#[from] skytraq_transport::TransportError),

    /// Frame-level error: I/O, end-of-stream, or a rejected frame.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The receiver rejected the command.
    #[error("received NACK for ID {acked} on attempt to send {sent}")]
    Nack { acked: MessageId, sent: MessageId },

    /// Too many unrelated frames arrived while waiting for an acknowledgement.
    #[error("too many irrelevant messages while waiting for ACK/NACK for message ID {id}")]
    TooManyIrrelevant { id: MessageId, count: usize },

    /// Every attempt failed; `source` is the last failure.
    #[error("exceeded retries ({attempts} attempts): {source}")]
    ExceededRetries {
        attempts: u32,
        #[source]
        source: Box<LinkError>,
    },

    /// A payload could not be projected onto its typed structure.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),
}

/// Broad classes of failure, by what the caller can do about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The transport failed or ended; reopen it.
    Transport,
    /// Noise or one corrupted frame; reading again resynchronizes.
    Framing,
    /// NACK, too many irrelevant frames, or retries exhausted.
    Protocol,
    /// A valid frame with an unexpected payload layout.
    Conversion,
}

impl LinkError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinkError::Transport(_) => ErrorKind::Transport,
            LinkError::Frame(err) if err.is_framing() => ErrorKind::Framing,
            LinkError::Frame(FrameError::PayloadTooLarge { .. }) => ErrorKind::Protocol,
            LinkError::Frame(_) => ErrorKind::Transport,
            LinkError::Nack { .. }
            | LinkError::TooManyIrrelevant { .. }
            | LinkError::ExceededRetries { .. } => ErrorKind::Protocol,
            LinkError::Conversion(_) => ErrorKind::Conversion,
        }
    }

    /// The innermost error behind any retry wrapping.
    pub fn last_cause(&self) -> &LinkError {
        match self {
            LinkError::ExceededRetries { source, .. } => source.last_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, LinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let nack = LinkError::Nack {
            acked: MessageId(2),
            sent: MessageId(2),
        };
        assert_eq!(
            nack.to_string(),
            "received NACK for ID 0x02 on attempt to send 0x02"
        );

        let wrapped = LinkError::ExceededRetries {
            attempts: 3,
            source: Box::new(nack),
        };
        assert!(wrapped.to_string().starts_with("exceeded retries"));
        assert!(matches!(wrapped.last_cause(), LinkError::Nack { .. }));
    }

    #[test]
    fn kinds() {
        assert_eq!(
            LinkError::Frame(FrameError::ConnectionClosed).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            LinkError::Frame(FrameError::EmptyFrame).kind(),
            ErrorKind::Framing
        );
        assert_eq!(
            LinkError::TooManyIrrelevant {
                id: MessageId(3),
                count: 6
            }
            .kind(),
            ErrorKind::Protocol
        );
        assert_eq!(
            LinkError::Conversion(ConversionError::LengthMismatch {
                structure: "SoftwareVersion",
                expected: 13,
                actual: 2
            })
            .kind(),
            ErrorKind::Conversion
        );
    }
}
