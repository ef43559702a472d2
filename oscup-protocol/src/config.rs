//! Link timing and validation thresholds
//!
//! All durations are in ticks of the link's [`Clock`](oscup_hal::Clock).
//! The defaults assume a 10 kHz clock and must match on both ends.

use oscup_hal::Ticks;

use crate::error::ProtocolError;
use crate::frame::MAX_PAYLOAD_LENGTH;

/// Total ACK wait per transaction: 15 ms at 10 kHz
pub const DEFAULT_MAX_ACK_WAIT: Ticks = 150;
/// Spacing between resends: 5 ms at 10 kHz
pub const DEFAULT_RETRY_INTERVAL: Ticks = 50;
/// Resends allowed per transaction
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
/// Sender's per-read timeout: 5 ms at 10 kHz
pub const DEFAULT_READ_TIMEOUT: Ticks = 50;
/// Receiver's wait for one frame: 20 ms at 10 kHz
pub const DEFAULT_FRAME_TIMEOUT: Ticks = 200;

/// Protocol tuning shared by the sender and receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProtocolConfig {
    /// Time budget for one `write`, extended once by `retry_interval` on NACK
    pub max_ack_wait: Ticks,
    /// Minimum spacing between resends
    pub retry_interval: Ticks,
    /// Maximum resends per `write`
    pub max_attempts: u32,
    /// Upper bound on each reply read inside `write`
    pub read_timeout: Ticks,
    /// How long `read` waits for a complete frame
    pub frame_timeout: Ticks,
    /// Frames declaring fewer payload bytes than this are dropped unanswered.
    /// Zero disables the check; 5 matches peers that only ever exchange
    /// reply-sized or larger payloads.
    pub min_declared_length: u8,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolConfig {
    pub const fn new() -> Self {
        Self {
            max_ack_wait: DEFAULT_MAX_ACK_WAIT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            read_timeout: DEFAULT_READ_TIMEOUT,
            frame_timeout: DEFAULT_FRAME_TIMEOUT,
            min_declared_length: 0,
        }
    }

    /// Reject settings that would make a transaction unbounded or impossible
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.max_ack_wait == 0 || self.retry_interval == 0 || self.max_attempts == 0 {
            return Err(ProtocolError::InvalidArgument);
        }
        if usize::from(self.min_declared_length) > MAX_PAYLOAD_LENGTH {
            return Err(ProtocolError::InvalidArgument);
        }
        Ok(())
    }
}
