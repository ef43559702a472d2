//! Protocol error kinds
//!
//! Every failure is returned to the immediate caller; nothing is swallowed.

use core::fmt;

/// Errors surfaced by the codec and the link state machines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Payload or declared frame length out of bounds
    Length,
    /// Required input absent, too short, or otherwise unusable
    InvalidArgument,
    /// Checksum mismatch on a decoded frame
    Crc,
    /// Sender gave up without seeing a valid ACK
    AckTimeout,
    /// Receiver's bounded wait produced no complete frame
    NoData,
    /// Underlying transport failed
    Io,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ProtocolError::Length => "length out of bounds",
            ProtocolError::InvalidArgument => "invalid argument",
            ProtocolError::Crc => "checksum mismatch",
            ProtocolError::AckTimeout => "no acknowledgement before deadline",
            ProtocolError::NoData => "no frame received",
            ProtocolError::Io => "transport failure",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for ProtocolError {}
