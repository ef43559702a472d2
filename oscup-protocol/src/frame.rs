//! Fixed-length wire frame
//!
//! Frame format, every frame exactly [`FRAME_LENGTH`] bytes:
//! - ID (1 byte): sender's device identifier
//! - COMMAND (1 byte): application command or reserved reply code
//! - LENGTH (1 byte): payload byte count (0-40)
//! - PAYLOAD (40 bytes): `LENGTH` data bytes, zero-padded to capacity
//! - CRC (2 bytes): little-endian CRC-16 over the preceding 43 bytes
//!
//! There is no start byte and no escaping. Frame boundaries come only from
//! both ends agreeing on the length.

use crate::crc::crc16;
use crate::error::ProtocolError;

/// Size of every frame on the wire
pub const FRAME_LENGTH: usize = 45;

/// Bytes in front of the payload (ID + COMMAND + LENGTH)
pub const HEADER_LENGTH: usize = 3;

/// Bytes after the payload region
pub const CRC_LENGTH: usize = 2;

/// Largest payload a frame can carry
pub const MAX_PAYLOAD_LENGTH: usize = FRAME_LENGTH - HEADER_LENGTH - CRC_LENGTH;

/// Offset of the CRC low byte; also the length of the checksummed region
pub const CRC_OFFSET: usize = FRAME_LENGTH - CRC_LENGTH;

const ID_OFFSET: usize = 0;
const COMMAND_OFFSET: usize = 1;
const LENGTH_OFFSET: usize = 2;

/// One frame's worth of raw bytes
///
/// The buffer is always full size; field access goes through the accessors
/// so no caller does offset arithmetic of its own.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; FRAME_LENGTH],
}

impl Default for Frame {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id())
            .field("command", &self.command())
            .field("length", &self.declared_length())
            .field("crc", &self.crc())
            .finish()
    }
}

impl Frame {
    /// An all-zero frame
    pub const fn zeroed() -> Self {
        Self {
            bytes: [0; FRAME_LENGTH],
        }
    }

    /// Wrap an already received buffer
    pub const fn from_array(bytes: [u8; FRAME_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Copy a frame out of a slice that must be exactly [`FRAME_LENGTH`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let bytes: [u8; FRAME_LENGTH] = bytes.try_into().map_err(|_| ProtocolError::Length)?;
        Ok(Self { bytes })
    }

    /// Build a frame from its logical fields
    ///
    /// A `crc` of zero leaves the trailing bytes untouched (zero), which is
    /// how the first pass of the two-pass encode leaves room for the checksum.
    pub(crate) fn encode(
        id: u8,
        command: u8,
        payload: &[u8],
        crc: u16,
    ) -> Result<Self, ProtocolError> {
        if payload.len() > MAX_PAYLOAD_LENGTH {
            return Err(ProtocolError::Length);
        }

        let mut frame = Self::zeroed();
        frame.bytes[ID_OFFSET] = id;
        frame.bytes[COMMAND_OFFSET] = command;
        frame.bytes[LENGTH_OFFSET] = payload.len() as u8;
        frame.bytes[HEADER_LENGTH..HEADER_LENGTH + payload.len()].copy_from_slice(payload);
        if crc != 0 {
            frame.bytes[CRC_OFFSET..].copy_from_slice(&crc.to_le_bytes());
        }
        Ok(frame)
    }

    /// Raw wire bytes
    pub fn as_bytes(&self) -> &[u8; FRAME_LENGTH] {
        &self.bytes
    }

    /// Mutable raw bytes, for transports filling a frame in place
    pub fn as_mut_bytes(&mut self) -> &mut [u8; FRAME_LENGTH] {
        &mut self.bytes
    }

    pub fn id(&self) -> u8 {
        self.bytes[ID_OFFSET]
    }

    pub fn command(&self) -> u8 {
        self.bytes[COMMAND_OFFSET]
    }

    /// LENGTH byte exactly as it arrived, not yet range checked
    pub fn declared_length(&self) -> u8 {
        self.bytes[LENGTH_OFFSET]
    }

    /// The `LENGTH` payload bytes
    ///
    /// Fails with [`ProtocolError::Length`] if the declared length does not
    /// fit the payload region; nothing past the header is touched in that case.
    pub fn payload(&self) -> Result<&[u8], ProtocolError> {
        let len = self.declared_length() as usize;
        if len > MAX_PAYLOAD_LENGTH {
            return Err(ProtocolError::Length);
        }
        Ok(&self.bytes[HEADER_LENGTH..HEADER_LENGTH + len])
    }

    /// CRC field as carried in the frame (low byte first on the wire)
    pub fn crc(&self) -> u16 {
        u16::from_le_bytes([self.bytes[CRC_OFFSET], self.bytes[CRC_OFFSET + 1]])
    }

    /// Header, payload and padding: everything the CRC covers
    pub fn checksum_region(&self) -> &[u8] {
        &self.bytes[..CRC_OFFSET]
    }

    /// CRC recomputed over [`Frame::checksum_region`]
    pub fn computed_crc(&self) -> u16 {
        crc16(self.checksum_region())
    }

    pub fn crc_matches(&self) -> bool {
        self.crc() == self.computed_crc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_constants() {
        assert_eq!(FRAME_LENGTH, 45);
        assert_eq!(MAX_PAYLOAD_LENGTH, 40);
        assert_eq!(CRC_OFFSET, 43);
    }

    #[test]
    fn test_encode_field_offsets() {
        let frame = Frame::encode(0x07, 0x01, &[0xAA, 0xBB, 0xCC], 0x1234).unwrap();
        let bytes = frame.as_bytes();

        assert_eq!(bytes[0], 0x07); // id
        assert_eq!(bytes[1], 0x01); // command
        assert_eq!(bytes[2], 3); // length
        assert_eq!(&bytes[3..6], &[0xAA, 0xBB, 0xCC]);
        assert!(bytes[6..43].iter().all(|&b| b == 0)); // padding
        assert_eq!(bytes[43], 0x34); // crc low
        assert_eq!(bytes[44], 0x12); // crc high
        assert_eq!(frame.crc(), 0x1234);
    }

    #[test]
    fn test_zero_crc_leaves_trailer_clear() {
        let frame = Frame::encode(1, 2, &[9; 40], 0).unwrap();
        assert_eq!(&frame.as_bytes()[43..], &[0, 0]);
    }

    #[test]
    fn test_encode_payload_too_large() {
        let payload = [0u8; MAX_PAYLOAD_LENGTH + 1];
        assert_eq!(Frame::encode(0, 1, &payload, 0), Err(ProtocolError::Length));
    }

    #[test]
    fn test_from_bytes_requires_exact_length() {
        assert_eq!(Frame::from_bytes(&[0u8; 44]), Err(ProtocolError::Length));
        assert_eq!(Frame::from_bytes(&[0u8; 46]), Err(ProtocolError::Length));
        assert!(Frame::from_bytes(&[0u8; 45]).is_ok());
    }

    #[test]
    fn test_payload_rejects_overlong_declared_length() {
        let mut bytes = [0u8; FRAME_LENGTH];
        bytes[2] = 41;
        let frame = Frame::from_array(bytes);
        assert_eq!(frame.declared_length(), 41);
        assert_eq!(frame.payload(), Err(ProtocolError::Length));

        bytes[2] = 0xFF;
        assert_eq!(Frame::from_array(bytes).payload(), Err(ProtocolError::Length));
    }

    #[test]
    fn test_checksum_region_includes_padding() {
        let frame = Frame::encode(1, 1, &[5], 0).unwrap();
        assert_eq!(frame.checksum_region().len(), 43);

        let mut padded = frame;
        padded.as_mut_bytes()[30] = 0x01;
        assert_ne!(frame.computed_crc(), padded.computed_crc());
    }

    #[test]
    fn test_crc_matches() {
        let unsealed = Frame::encode(3, 1, b"hello", 0).unwrap();
        let crc = unsealed.computed_crc();
        let sealed = Frame::encode(3, 1, b"hello", crc).unwrap();
        assert!(sealed.crc_matches());

        let mut corrupted = sealed;
        corrupted.as_mut_bytes()[4] ^= 0x10;
        assert!(!corrupted.crc_matches());
    }
}
