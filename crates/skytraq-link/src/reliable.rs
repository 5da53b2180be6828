//! Acknowledged delivery.
//!
//! The receiver answers every command with an ACK or NACK whose first payload
//! byte names the command. It keeps streaming telemetry meanwhile, and may
//! still be answering earlier commands, so unrelated frames are expected while
//! waiting and only count against a small budget.

use skytraq_frame::{Frame, MessageId};
use skytraq_transport::Transport;
use tracing::{debug, error, warn};

use crate::error::{LinkError, Result};
use crate::link::Link;

impl<T: Transport> Link<T> {
    /// Write a frame and wait until the receiver acknowledges it.
    ///
    /// A NACK, a read failure, or too many irrelevant frames fails the
    /// attempt and the frame is written again, up to
    /// [`crate::LinkConfig::max_attempts`] writes in total. A failed write is
    /// returned immediately without retrying.
    pub fn send(&mut self, frame: &Frame) -> Result<()> {
        let attempts = self.config.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            if let Err(err) = self.send_unconfirmed(frame) {
                error!(error = %err, "write failed");
                return Err(err);
            }

            match self.await_ack(frame.id) {
                Ok(()) => {
                    if attempt > 1 {
                        warn!(
                            retry_count = attempt - 1,
                            "write frame successful after retry"
                        );
                    }
                    return Ok(());
                }
                Err(err) if attempt >= attempts => {
                    return Err(LinkError::ExceededRetries {
                        attempts,
                        source: Box::new(err),
                    });
                }
                Err(err) => {
                    error!(error = %err, attempt, "retrying message {}", frame.id);
                }
            }
        }
    }

    /// Read until an ACK or NACK for `id` arrives.
    ///
    /// ACK/NACK frames for other ids and every other message kind are
    /// irrelevant; once more than
    /// [`crate::LinkConfig::max_irrelevant_frames`] of them have been seen
    /// the wait fails. The frame that crosses the limit is dropped.
    pub fn await_ack(&mut self, id: MessageId) -> Result<()> {
        let limit = self.config.max_irrelevant_frames;
        let mut irrelevant = 0usize;

        loop {
            let frame = self.read_frame()?;
            let target = frame.ack_target();
            if !frame.id.is_acknowledgement() {
                warn!(message_id = %frame.id, "ignoring non-ACK/NACK frame");
            } else if target != Some(id) {
                warn!(
                    kind = frame.id.name(),
                    message_id = ?target,
                    irrelevant_frame_count = irrelevant,
                    "unexpected acknowledgement"
                );
            } else if frame.id == MessageId::ACK {
                debug!(message_id = %id, "received expected ACK");
                return Ok(());
            } else {
                return Err(LinkError::Nack {
                    acked: id,
                    sent: id,
                });
            }

            irrelevant += 1;
            if irrelevant > limit {
                return Err(LinkError::TooManyIrrelevant {
                    id,
                    count: irrelevant,
                });
            }
        }
    }
}
