//! Sender state machine
//!
//! ```text
//! Idle ──write──▶ Sent ──▶ AwaitingReply ──ACK──▶ Acked
//!                  ▲            │
//!                  └─NACK / bad CRC (resend, bounded)
//!                               │
//!                   deadline or attempts exhausted ──▶ Failed
//! ```
//!
//! Silence never causes a resend; only a reply that arrived and was either
//! garbled or a NACK does. Attempts and time are independent caps.

use oscup_hal::{Clock, Ticks, Uart};

use crate::config::ProtocolConfig;
use crate::error::ProtocolError;
use crate::frame::Frame;
use crate::link::{read_frame, send_frame};
use crate::packet::ReplyKind;

/// Summary of a successful `write`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Delivery {
    /// Frames sent after the first
    pub resends: u32,
    /// Valid NACKs received
    pub nacks: u32,
    /// Ticks from first transmission to the ACK
    pub elapsed: Ticks,
}

/// Working state for one `write`, dropped when the call returns
struct Transaction {
    frame: Frame,
    start: Ticks,
    deadline: Ticks,
    attempts: u32,
    nacks: u32,
    extended: bool,
    last_reject: ProtocolError,
}

impl Transaction {
    fn new(frame: Frame, start: Ticks, config: &ProtocolConfig) -> Self {
        Self {
            frame,
            start,
            deadline: start.saturating_add(config.max_ack_wait),
            attempts: 0,
            nacks: 0,
            extended: false,
            last_reject: ProtocolError::AckTimeout,
        }
    }

    /// Earliest tick at which the next reply may be read
    fn next_read_at(&self, config: &ProtocolConfig) -> Ticks {
        self.start
            .saturating_add(Ticks::from(self.attempts).saturating_mul(config.retry_interval))
    }
}

/// Send `frame` and wait for its acknowledgement
pub(crate) fn transmit<U: Uart, C: Clock>(
    uart: &mut U,
    clock: &mut C,
    config: &ProtocolConfig,
    frame: Frame,
) -> Result<Delivery, ProtocolError> {
    // Anything already queued belongs to an earlier exchange
    uart.discard_pending().map_err(|_| ProtocolError::Io)?;
    send_frame(uart, &frame)?;

    let start = clock.now();
    let mut tx = Transaction::new(frame, start, config);
    debug!(
        "sent command {} len {}, deadline {}",
        frame.command(),
        frame.declared_length(),
        tx.deadline
    );

    loop {
        let now = clock.now();
        if now > tx.deadline {
            warn!(
                "giving up after {} resends ({} nacks): {}",
                tx.attempts,
                tx.nacks,
                tx.last_reject
            );
            return Err(tx.last_reject);
        }

        let next_read_at = tx.next_read_at(config);
        if now < next_read_at {
            clock.wait_until(next_read_at.min(tx.deadline));
            continue;
        }

        let remaining = tx.deadline - now;
        let timeout = C::ticks_to_duration(config.read_timeout.min(remaining).max(1));
        let Some(reply) = read_frame(uart, timeout)? else {
            continue;
        };

        if !reply.crc_matches() {
            trace!("reply crc {} != {}", reply.crc(), reply.computed_crc());
            tx.last_reject = ProtocolError::Crc;
            resend(uart, config, &mut tx)?;
            continue;
        }

        match ReplyKind::from_code(reply.command()) {
            Some(ReplyKind::Ack) => {
                let elapsed = clock.now().saturating_sub(tx.start);
                debug!("acked after {} resends, {} ticks", tx.attempts, elapsed);
                return Ok(Delivery {
                    resends: tx.attempts,
                    nacks: tx.nacks,
                    elapsed,
                });
            }
            Some(ReplyKind::Nack) => {
                tx.nacks += 1;
                tx.last_reject = ProtocolError::AckTimeout;
                if !tx.extended {
                    tx.deadline = tx.deadline.saturating_add(config.retry_interval);
                    tx.extended = true;
                }
                resend(uart, config, &mut tx)?;
            }
            None => {
                trace!("ignoring command {} while awaiting reply", reply.command());
            }
        }
    }
}

/// Resend the transaction's frame, or fail once the attempt budget is spent
fn resend<U: Uart>(
    uart: &mut U,
    config: &ProtocolConfig,
    tx: &mut Transaction,
) -> Result<(), ProtocolError> {
    if tx.attempts >= config.max_attempts {
        warn!("attempt budget of {} spent", config.max_attempts);
        return Err(tx.last_reject);
    }
    tx.attempts += 1;
    trace!("resend {}", tx.attempts);
    send_frame(uart, &tx.frame)
}
