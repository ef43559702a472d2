//! Receiver state machine
//!
//! One bounded wait for one frame, then exactly one verdict written back.
//! The receiver never retries; callers that want to keep listening loop.

use oscup_hal::{Clock, Uart};

use crate::config::ProtocolConfig;
use crate::error::ProtocolError;
use crate::frame::MAX_PAYLOAD_LENGTH;
use crate::link::{read_frame, send_frame};
use crate::packet::{Packet, ReplyKind};

/// Wait for one frame, validate it and answer with ACK or NACK
pub(crate) fn receive<U: Uart, C: Clock>(
    uart: &mut U,
    id: u8,
    config: &ProtocolConfig,
) -> Result<Packet, ProtocolError> {
    uart.discard_pending().map_err(|_| ProtocolError::Io)?;

    let nack = Packet::reply(id, ReplyKind::Nack)?.to_frame()?;
    let timeout = C::ticks_to_duration(config.frame_timeout);

    // A failed read is answered like silence, then reported as Io
    let frame = match read_frame(uart, timeout) {
        Ok(Some(frame)) => frame,
        Ok(None) => {
            trace!("no frame within {} ticks", config.frame_timeout);
            send_frame(uart, &nack)?;
            return Err(ProtocolError::NoData);
        }
        Err(e) => {
            warn!("read failed: {}", e);
            send_frame(uart, &nack)?;
            return Err(e);
        }
    };

    let declared = frame.declared_length();
    if usize::from(declared) > MAX_PAYLOAD_LENGTH {
        warn!("declared length {} exceeds capacity", declared);
        send_frame(uart, &nack)?;
        return Err(ProtocolError::Length);
    }
    if declared < config.min_declared_length {
        debug!(
            "declared length {} below threshold {}, dropped",
            declared,
            config.min_declared_length
        );
        return Err(ProtocolError::Length);
    }

    if !frame.crc_matches() {
        warn!(
            "crc mismatch from {}: carried {} computed {}",
            frame.id(),
            frame.crc(),
            frame.computed_crc()
        );
        send_frame(uart, &nack)?;
        return Err(ProtocolError::Crc);
    }

    let packet = Packet::decode(&frame)?;
    let ack = Packet::reply(id, ReplyKind::Ack)?.to_frame()?;
    send_frame(uart, &ack)?;
    debug!(
        "delivered command {} len {} from {}",
        packet.command,
        packet.length(),
        packet.id
    );
    Ok(packet)
}
