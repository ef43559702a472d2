//! Logical packets and command codes

use heapless::Vec;

use crate::error::ProtocolError;
use crate::frame::{Frame, MAX_PAYLOAD_LENGTH};

/// Command codes
pub mod command {
    /// Application command: share data with the peer
    pub const SHARE: u8 = 0x01;
    /// Application command: confirm a previous share
    pub const CONFIRM: u8 = 0x02;
    /// Reserved reply: frame accepted
    pub const ACK: u8 = 0xFE;
    /// Reserved reply: frame rejected or nothing usable received
    pub const NACK: u8 = 0xFF;

    /// Whether `code` is one of the two reply codes
    pub const fn is_reserved(code: u8) -> bool {
        code == ACK || code == NACK
    }
}

/// Payload length carried by ACK/NACK replies (all zero bytes)
pub const REPLY_PAYLOAD_LENGTH: usize = 5;

/// Receiver verdict on a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyKind {
    Ack,
    Nack,
}

impl ReplyKind {
    /// Wire command code
    pub const fn code(self) -> u8 {
        match self {
            ReplyKind::Ack => command::ACK,
            ReplyKind::Nack => command::NACK,
        }
    }

    /// Classify a command byte
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            command::ACK => Some(ReplyKind::Ack),
            command::NACK => Some(ReplyKind::Nack),
            _ => None,
        }
    }
}

/// A logical message before encoding or after decoding
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet {
    /// Device id of the sender
    pub id: u8,
    /// Command code
    pub command: u8,
    /// Payload bytes; the wire LENGTH is derived from this
    pub payload: Vec<u8, MAX_PAYLOAD_LENGTH>,
    /// Checksum, zero until sealed or when the frame carried zero
    pub crc: u16,
}

impl Packet {
    /// Create an unsealed packet
    pub fn new(id: u8, command: u8, payload: &[u8]) -> Result<Self, ProtocolError> {
        let payload = Vec::from_slice(payload).map_err(|_| ProtocolError::Length)?;
        Ok(Self {
            id,
            command,
            payload,
            crc: 0,
        })
    }

    /// ACK or NACK reply stamped with `id`
    pub fn reply(id: u8, kind: ReplyKind) -> Result<Self, ProtocolError> {
        Self::new(id, kind.code(), &[0; REPLY_PAYLOAD_LENGTH])
    }

    /// Payload byte count as it goes on the wire
    pub fn length(&self) -> u8 {
        self.payload.len() as u8
    }

    /// Single-pass encode; the CRC bytes are written only if `crc` is non-zero
    pub fn encode(&self) -> Result<Frame, ProtocolError> {
        Frame::encode(self.id, self.command, &self.payload, self.crc)
    }

    /// Compute the checksum and produce the outgoing frame
    ///
    /// Encodes once with `crc = 0`, checksums the first 43 bytes of that
    /// frame, stores the result in `self.crc` and encodes again.
    pub fn to_frame(&mut self) -> Result<Frame, ProtocolError> {
        self.crc = 0;
        let unsealed = self.encode()?;
        self.crc = unsealed.computed_crc();
        self.encode()
    }

    /// Rebuild a packet from a frame
    ///
    /// Only the declared length is checked; CRC validation belongs to the
    /// receiver.
    pub fn decode(frame: &Frame) -> Result<Self, ProtocolError> {
        let payload = frame.payload()?;
        Ok(Self {
            id: frame.id(),
            command: frame.command(),
            payload: Vec::from_slice(payload).map_err(|_| ProtocolError::Length)?,
            crc: frame.crc(),
        })
    }
}
