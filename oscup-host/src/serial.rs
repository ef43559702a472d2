//! Serial port transport

use std::io::{self, Read, Write};
use std::time::Duration;

use oscup_hal::{UartRx, UartTx};
use serialport::{ClearBuffer, SerialPort};

use crate::error::HostError;

/// Shortest timeout handed to the OS; zero would turn reads non-blocking
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// A serial device implementing the HAL UART traits
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `path` at `baudrate`, 8N1
    pub fn open(path: &str, baudrate: u32) -> Result<Self, HostError> {
        let port = serialport::new(path, baudrate)
            .timeout(MIN_READ_TIMEOUT)
            .open()?;
        tracing::info!(path, baudrate, "serial port open");
        Ok(Self { port })
    }

    /// Wrap a port opened elsewhere
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }
}

impl UartTx for SerialTransport {
    type Error = io::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), io::Error> {
        self.port.write_all(data)
    }

    fn flush(&mut self) -> Result<(), io::Error> {
        self.port.flush()
    }
}

impl UartRx for SerialTransport {
    type Error = io::Error;

    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize, io::Error> {
        self.port.set_timeout(timeout.max(MIN_READ_TIMEOUT))?;
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn discard_pending(&mut self) -> Result<(), io::Error> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }
}
