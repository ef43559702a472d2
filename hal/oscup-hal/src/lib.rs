//! Oscup Hardware Abstraction Layer
//!
//! This crate defines the two collaborators the protocol core needs from its
//! host: a byte-oriented serial link and a monotonic tick clock. Board support
//! (pin muxing, UART driver installation, timer setup) lives in whatever
//! implements these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (oscup-host, firmware)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  oscup-protocol (framing, ACK/NACK)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  oscup-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`clock::Clock`] - Monotonic tick source

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::{Clock, Ticks};
pub use uart::{Uart, UartRx, UartTx};
