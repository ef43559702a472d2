//! Link endpoint
//!
//! A [`Link`] owns one UART and one clock and runs at most one transaction
//! at a time; `&mut self` on every operation enforces that.

use core::time::Duration;

use oscup_hal::{Clock, Uart};

use crate::config::ProtocolConfig;
use crate::error::ProtocolError;
use crate::frame::{Frame, FRAME_LENGTH, MAX_PAYLOAD_LENGTH};
use crate::packet::{command, Packet};
use crate::receiver::receive;
use crate::sender::{transmit, Delivery};

/// One end of a point-to-point serial link
pub struct Link<U, C> {
    id: u8,
    config: ProtocolConfig,
    uart: U,
    clock: C,
}

impl<U: Uart, C: Clock> Link<U, C> {
    /// Create a link with default timing
    pub fn new(id: u8, uart: U, clock: C) -> Self {
        Self {
            id,
            config: ProtocolConfig::default(),
            uart,
            clock,
        }
    }

    /// Create a link with custom timing, rejecting unusable settings
    pub fn with_config(
        id: u8,
        config: ProtocolConfig,
        uart: U,
        clock: C,
    ) -> Result<Self, ProtocolError> {
        config.validate()?;
        Ok(Self {
            id,
            config,
            uart,
            clock,
        })
    }

    /// Device id stamped on every outgoing frame
    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Give back the UART and clock
    pub fn release(self) -> (U, C) {
        (self.uart, self.clock)
    }

    /// Send `payload` under `command` and wait for the peer's ACK
    ///
    /// `command` must not be one of the reserved reply codes.
    pub fn write(&mut self, command: u8, payload: &[u8]) -> Result<Delivery, ProtocolError> {
        if payload.len() > MAX_PAYLOAD_LENGTH {
            return Err(ProtocolError::Length);
        }
        if command::is_reserved(command) {
            return Err(ProtocolError::InvalidArgument);
        }

        let frame = Packet::new(self.id, command, payload)?.to_frame()?;
        transmit(&mut self.uart, &mut self.clock, &self.config, frame)
    }

    /// Send the first `length` bytes of `payload`
    ///
    /// Matches call sites that pass the length separately. A missing or
    /// short payload with a non-zero length is rejected.
    pub fn write_declared(
        &mut self,
        command: u8,
        length: usize,
        payload: Option<&[u8]>,
    ) -> Result<Delivery, ProtocolError> {
        if length > MAX_PAYLOAD_LENGTH {
            return Err(ProtocolError::Length);
        }
        let payload: &[u8] = match payload {
            Some(bytes) => bytes.get(..length).ok_or(ProtocolError::InvalidArgument)?,
            None if length == 0 => &[],
            None => return Err(ProtocolError::InvalidArgument),
        };
        self.write(command, payload)
    }

    /// Wait for one frame from the peer and acknowledge it
    ///
    /// A single attempt bounded by `frame_timeout`; loop to keep listening.
    pub fn read(&mut self) -> Result<Packet, ProtocolError> {
        receive::<U, C>(&mut self.uart, self.id, &self.config)
    }
}

/// Write one whole frame
pub(crate) fn send_frame<U: Uart>(uart: &mut U, frame: &Frame) -> Result<(), ProtocolError> {
    uart.write_blocking(frame.as_bytes())
        .map_err(|_| ProtocolError::Io)?;
    uart.flush().map_err(|_| ProtocolError::Io)
}

/// Collect one frame's worth of bytes
///
/// Reads until the frame is full or a read times out empty. A short frame
/// is dropped and reported as `None`, same as silence.
pub(crate) fn read_frame<U: Uart>(
    uart: &mut U,
    timeout: Duration,
) -> Result<Option<Frame>, ProtocolError> {
    let mut frame = Frame::zeroed();
    let mut filled = 0;
    while filled < FRAME_LENGTH {
        let n = uart
            .read_timeout(&mut frame.as_mut_bytes()[filled..], timeout)
            .map_err(|_| ProtocolError::Io)?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    if filled < FRAME_LENGTH {
        if filled > 0 {
            trace!("dropped {} byte fragment", filled);
        }
        return Ok(None);
    }
    Ok(Some(frame))
}
