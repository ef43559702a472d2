//! CRC-16 engine
//!
//! Right-shifting, table-less CRC-16 with initial value `0xFFFF` and the
//! constant `0xBFA5` (49061). This is not CRC-16/CCITT or XMODEM; peers
//! already in the field compute exactly this, so it must stay bit-for-bit.

use crate::error::ProtocolError;

/// Initial register value
pub const CRC_INIT: u16 = 0xFFFF;

/// Feedback constant XORed in after a shift that drops a set bit
pub const CRC_POLY: u16 = 0xBFA5;

/// Compute the checksum over every byte of `data`
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = CRC_INIT;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ CRC_POLY;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Compute the checksum over the first `len` bytes of `data`
///
/// Asking for more bytes than the buffer holds is a caller bug and fails
/// with [`ProtocolError::InvalidArgument`] instead of returning a value.
pub fn compute_crc(data: &[u8], len: usize) -> Result<u16, ProtocolError> {
    let region = data.get(..len).ok_or(ProtocolError::InvalidArgument)?;
    Ok(crc16(region))
}
