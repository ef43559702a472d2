//! Fixed-frame serial link protocol
//!
//! Turns a lossy half-duplex byte stream into bounded request/acknowledge
//! exchanges. Every frame, in both directions, is the same size:
//! ```text
//! ┌────┬─────────┬────────┬──────────────────────┬──────────┐
//! │ ID │ COMMAND │ LENGTH │ PAYLOAD (zero-padded) │ CRC (LE) │
//! │ 1B │ 1B      │ 1B     │ 40B                   │ 2B       │
//! └────┴─────────┴────────┴──────────────────────┴──────────┘
//! ```
//!
//! The sender writes one frame and waits for an ACK, resending on NACK or
//! on a garbled reply within a time and attempt budget. The receiver waits
//! for one frame, checks it and writes back ACK or NACK.
//!
//! Hardware access goes through the traits in [`oscup_hal`], so the same
//! state machines run on a microcontroller UART and on a host serial port.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod crc;
pub mod error;
pub mod frame;
pub mod link;
pub mod packet;
mod receiver;
pub mod sender;

#[cfg(test)]
mod testing;

pub use config::ProtocolConfig;
pub use crc::{compute_crc, crc16};
pub use error::ProtocolError;
pub use frame::{Frame, FRAME_LENGTH, MAX_PAYLOAD_LENGTH};
pub use link::Link;
pub use packet::{command, Packet, ReplyKind, REPLY_PAYLOAD_LENGTH};
pub use sender::Delivery;
