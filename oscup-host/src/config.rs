//! Host configuration
//!
//! Loaded from a TOML file; every key is optional and falls back to the
//! defaults below. Timing values are in 10 kHz ticks.
//!
//! ```toml
//! port = "/dev/ttyUSB0"
//! baudrate = 115200
//! device_id = 0x1C
//!
//! [protocol]
//! max_ack_wait = 150
//! retry_interval = 50
//! max_attempts = 10
//! ```

use std::fs;
use std::path::Path;

use oscup_protocol::ProtocolConfig;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_BAUDRATE: u32 = 115_200;
pub const DEFAULT_DEVICE_ID: u8 = 0x1C;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Serial device path
    pub port: String,
    pub baudrate: u32,
    /// Id stamped on frames this host sends
    pub device_id: u8,
    pub protocol: ProtocolConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baudrate: DEFAULT_BAUDRATE,
            device_id: DEFAULT_DEVICE_ID,
            protocol: ProtocolConfig::default(),
        }
    }
}

impl HostConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let text = fs::read_to_string(path).map_err(|source| HostError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self, HostError> {
        let config: Self = toml::from_str(text)?;
        config.protocol.validate()?;
        Ok(config)
    }
}
