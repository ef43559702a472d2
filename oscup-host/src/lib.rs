//! Host-side support for the Oscup serial protocol
//!
//! Implements the [`oscup_hal`] traits on top of the operating system: a
//! serial port transport, a wall-clock tick source and an in-memory port
//! pair for running both ends of a link in one process.

pub mod clock;
pub mod config;
pub mod error;
pub mod memory;
pub mod serial;

pub use clock::StdClock;
pub use config::HostConfig;
pub use error::HostError;
pub use memory::{pair, MemoryPort};
pub use serial::SerialTransport;
