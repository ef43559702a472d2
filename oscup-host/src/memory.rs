//! In-memory port pair
//!
//! Two [`MemoryPort`]s joined back to back: bytes written on one arrive on
//! the other. Each port can be told to corrupt its next outgoing writes,
//! which is enough to drive the NACK and bad-CRC paths end to end.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use oscup_hal::{UartRx, UartTx};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("peer port dropped")]
pub struct Disconnected;

/// One end of an in-memory link
pub struct MemoryPort {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
    corrupt_writes: usize,
}

/// Create two connected ports
pub fn pair() -> (MemoryPort, MemoryPort) {
    let (a_tx, b_rx) = mpsc::channel();
    let (b_tx, a_rx) = mpsc::channel();
    (MemoryPort::new(a_tx, a_rx), MemoryPort::new(b_tx, b_rx))
}

impl MemoryPort {
    fn new(tx: Sender<Vec<u8>>, rx: Receiver<Vec<u8>>) -> Self {
        Self {
            tx,
            rx,
            pending: VecDeque::new(),
            corrupt_writes: 0,
        }
    }

    /// Flip one bit in each of the next `count` writes
    pub fn corrupt_next_writes(&mut self, count: usize) {
        self.corrupt_writes = count;
    }
}

impl UartTx for MemoryPort {
    type Error = Disconnected;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Disconnected> {
        let mut chunk = data.to_vec();
        if self.corrupt_writes > 0 {
            self.corrupt_writes -= 1;
            if let Some(byte) = chunk.get_mut(data.len() / 2) {
                *byte ^= 0x01;
            }
        }
        self.tx.send(chunk).map_err(|_| Disconnected)
    }

    fn flush(&mut self) -> Result<(), Disconnected> {
        Ok(())
    }
}

impl UartRx for MemoryPort {
    type Error = Disconnected;

    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, Disconnected> {
        if self.pending.is_empty() {
            match self.rx.recv_timeout(timeout) {
                Ok(chunk) => self.pending.extend(chunk),
                Err(RecvTimeoutError::Timeout) => return Ok(0),
                Err(RecvTimeoutError::Disconnected) => return Err(Disconnected),
            }
        }
        let n = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn discard_pending(&mut self) -> Result<(), Disconnected> {
        self.pending.clear();
        while self.rx.try_recv().is_ok() {}
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Duration = Duration::from_millis(5);

    #[test]
    fn test_bytes_cross_over() {
        let (mut a, mut b) = pair();
        a.write_blocking(&[1, 2, 3]).unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(b.read_timeout(&mut buf, SHORT).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(a.read_timeout(&mut buf, SHORT).unwrap(), 0);
    }

    #[test]
    fn test_partial_reads_keep_remainder() {
        let (mut a, mut b) = pair();
        a.write_blocking(&[1, 2, 3, 4, 5]).unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(b.read_timeout(&mut buf, SHORT).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        let mut rest = [0u8; 8];
        assert_eq!(b.read_timeout(&mut rest, SHORT).unwrap(), 3);
        assert_eq!(&rest[..3], &[3, 4, 5]);
    }

    #[test]
    fn test_discard_pending() {
        let (mut a, mut b) = pair();
        a.write_blocking(&[9; 10]).unwrap();
        a.write_blocking(&[8; 10]).unwrap();

        b.discard_pending().unwrap();

        let mut buf = [0u8; 16];
        assert_eq!(b.read_timeout(&mut buf, SHORT).unwrap(), 0);
    }

    #[test]
    fn test_corrupt_next_write() {
        let (mut a, mut b) = pair();
        a.corrupt_next_writes(1);
        a.write_blocking(&[0; 4]).unwrap();
        a.write_blocking(&[0; 4]).unwrap();

        let mut buf = [0u8; 4];
        b.read_timeout(&mut buf, SHORT).unwrap();
        assert_eq!(buf, [0, 0, 1, 0]);
        b.read_timeout(&mut buf, SHORT).unwrap();
        assert_eq!(buf, [0; 4]);
    }

    #[test]
    fn test_dropped_peer() {
        let (a, mut b) = pair();
        drop(a);
        let mut buf = [0u8; 4];
        assert_eq!(b.read_timeout(&mut buf, SHORT), Err(Disconnected));
    }
}
