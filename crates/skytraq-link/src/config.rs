/// Total transmissions of one command before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Unrelated frames tolerated while waiting for one acknowledgement.
pub const DEFAULT_MAX_IRRELEVANT_FRAMES: usize = 5;

/// Delivery policy for a [`crate::Link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// Total send attempts (first try included). Zero is treated as one.
    pub max_attempts: u32,
    /// Irrelevant frames allowed per attempt; one more fails the attempt.
    pub max_irrelevant_frames: usize,
}

impl LinkConfig {
    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_irrelevant_frames: DEFAULT_MAX_IRRELEVANT_FRAMES,
        }
    }
}
