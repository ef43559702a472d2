//! In-memory doubles for the HAL traits

use std::collections::VecDeque;
use std::time::Duration;
use std::vec::Vec;

use oscup_hal::{Clock, Ticks, UartRx, UartTx};

use crate::frame::{Frame, FRAME_LENGTH};
use crate::packet::{Packet, ReplyKind};

/// What the peer puts on the wire when the next read finds the line idle
pub enum Arrival {
    Frame(Frame),
    Bytes(Vec<u8>),
    Silence,
    /// The read itself fails
    Fault,
}

/// UART that replays a script of arrivals and records every write
#[derive(Default)]
pub struct ScriptedUart {
    /// Bytes already on the line, unread
    pub rx: VecDeque<u8>,
    arrivals: VecDeque<Arrival>,
    /// Everything written, split per `write_blocking` call
    pub writes: Vec<Vec<u8>>,
    pub discards: usize,
    pub fail_writes: bool,
}

impl ScriptedUart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, arrival: Arrival) -> Self {
        self.arrivals.push_back(arrival);
        self
    }

    pub fn then_reply(self, id: u8, kind: ReplyKind) -> Self {
        self.then(Arrival::Frame(reply_frame(id, kind)))
    }

    /// Queue bytes as if they arrived before the next transaction started
    pub fn with_stale(mut self, bytes: &[u8]) -> Self {
        self.rx.extend(bytes.iter().copied());
        self
    }

    pub fn written_frames(&self) -> Vec<Frame> {
        self.writes
            .iter()
            .map(|w| Frame::from_bytes(w).expect("every write is one frame"))
            .collect()
    }

    pub fn pending_arrivals(&self) -> usize {
        self.arrivals.len()
    }
}

impl UartTx for ScriptedUart {
    type Error = ();

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
        if self.fail_writes {
            return Err(());
        }
        self.writes.push(data.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

impl UartRx for ScriptedUart {
    type Error = ();

    fn read_timeout(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize, ()> {
        if self.rx.is_empty() {
            match self.arrivals.pop_front() {
                Some(Arrival::Frame(frame)) => self.rx.extend(frame.as_bytes().iter().copied()),
                Some(Arrival::Bytes(bytes)) => self.rx.extend(bytes),
                Some(Arrival::Silence) | None => return Ok(0),
                Some(Arrival::Fault) => return Err(()),
            }
        }
        let n = buf.len().min(self.rx.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.rx.pop_front().unwrap_or(0);
        }
        Ok(n)
    }

    fn discard_pending(&mut self) -> Result<(), ()> {
        self.discards += 1;
        self.rx.clear();
        Ok(())
    }
}

/// 10 kHz clock that advances one tick per query and jumps on waits
#[derive(Default)]
pub struct FakeClock {
    pub now: Ticks,
}

impl Clock for FakeClock {
    const TICK_HZ: u32 = 10_000;

    fn now(&mut self) -> Ticks {
        self.now += 1;
        self.now
    }

    fn wait_until(&mut self, deadline: Ticks) {
        if deadline > self.now {
            self.now = deadline;
        }
    }
}

/// A sealed application frame as a peer would send it
pub fn peer_frame(id: u8, command: u8, payload: &[u8]) -> Frame {
    let mut packet = Packet::new(id, command, payload).expect("payload fits");
    packet.to_frame().expect("payload fits")
}

/// A sealed ACK or NACK
pub fn reply_frame(id: u8, kind: ReplyKind) -> Frame {
    let mut reply = Packet::reply(id, kind).expect("reply payload fits");
    reply.to_frame().expect("reply payload fits")
}

/// A reply frame whose CRC no longer matches
pub fn garbled_reply(id: u8, kind: ReplyKind) -> Frame {
    let mut frame = reply_frame(id, kind);
    frame.as_mut_bytes()[FRAME_LENGTH - 1] ^= 0x5A;
    frame
}
