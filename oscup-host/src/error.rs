//! Host error type

use std::path::PathBuf;

use oscup_protocol::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("serial port: {0}")]
    Serial(#[from] serialport::Error),

    #[error("payload is not valid hex: {0}")]
    Payload(#[from] hex::FromHexError),

    #[error("protocol: {0}")]
    Protocol(#[from] ProtocolError),
}
