//! `oscup` command line tool
//!
//! Talks to an Oscup peer over a serial port: listen for frames, send one,
//! or send one and wait for the peer's answer.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use oscup_host::{HostConfig, HostError, SerialTransport, StdClock};
use oscup_protocol::{command, Link, Packet, ProtocolError};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

type SerialLink = Link<SerialTransport, StdClock>;

#[derive(Debug, Parser)]
#[command(name = "oscup", version, about = "Fixed-frame ACK/NACK serial link tool")]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Serial device, overrides the config file
    #[arg(short, long, global = true)]
    port: Option<String>,

    /// Baud rate, overrides the config file
    #[arg(short, long, global = true)]
    baudrate: Option<u32>,

    /// Device id stamped on outgoing frames, overrides the config file
    #[arg(long, global = true, value_parser = parse_u8)]
    id: Option<u8>,

    #[command(subcommand)]
    action: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Receive frames until interrupted
    Listen,
    /// Send one frame and wait for its ACK
    Send(SendArgs),
    /// Send one frame, then wait for the peer's answer
    Exchange {
        #[command(flatten)]
        send: SendArgs,

        /// How long to keep reading for the answer
        #[arg(long, default_value_t = 200)]
        window_ms: u64,
    },
}

#[derive(Debug, Args)]
struct SendArgs {
    /// Command code (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_u8, default_value = "1")]
    command: u8,

    /// Payload as hex, up to 40 bytes
    #[arg(long, default_value = "")]
    payload: String,
}

fn parse_u8(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("{s:?} is not a byte value: {e}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), HostError> {
    let mut config = match &cli.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(baudrate) = cli.baudrate {
        config.baudrate = baudrate;
    }
    if let Some(id) = cli.id {
        config.device_id = id;
    }

    let transport = SerialTransport::open(&config.port, config.baudrate)?;
    let mut link = Link::with_config(config.device_id, config.protocol, transport, StdClock::new())?;
    info!(id = config.device_id, port = %config.port, "link ready");

    match cli.action {
        Command::Listen => listen(&mut link),
        Command::Send(args) => send(&mut link, &args),
        Command::Exchange { send: args, window_ms } => {
            exchange(&mut link, &args, Duration::from_millis(window_ms))
        }
    }
}

fn listen(link: &mut SerialLink) -> Result<(), HostError> {
    loop {
        match link.read() {
            Ok(packet) => report(&packet),
            Err(ProtocolError::NoData) => {}
            Err(ProtocolError::Io) => return Err(ProtocolError::Io.into()),
            Err(e) => warn!("receive failed: {e}"),
        }
    }
}

fn send(link: &mut SerialLink, args: &SendArgs) -> Result<(), HostError> {
    let payload = hex::decode(&args.payload)?;
    let delivery = link.write(args.command, &payload)?;
    info!(
        resends = delivery.resends,
        nacks = delivery.nacks,
        elapsed_ticks = delivery.elapsed,
        "delivered"
    );
    Ok(())
}

fn exchange(link: &mut SerialLink, args: &SendArgs, window: Duration) -> Result<(), HostError> {
    send(link, args)?;

    let start = Instant::now();
    while start.elapsed() < window {
        match link.read() {
            Ok(packet) => {
                report(&packet);
                return Ok(());
            }
            Err(ProtocolError::NoData) => {}
            Err(ProtocolError::Io) => return Err(ProtocolError::Io.into()),
            Err(e) => warn!("receive failed: {e}"),
        }
    }
    warn!("no answer within {} ms", window.as_millis());
    Ok(())
}

fn report(packet: &Packet) {
    info!(
        id = format_args!("{:#04x}", packet.id),
        command = packet.command,
        length = packet.length(),
        crc = format_args!("{:#06x}", packet.crc),
        payload = %hex::encode(&packet.payload),
        "packet"
    );
    // CONFIRM answers echo back a 64-bit value
    if packet.command == command::CONFIRM {
        if let Some(bytes) = packet.payload.get(..8) {
            let mut value = [0u8; 8];
            value.copy_from_slice(bytes);
            info!(value = u64::from_le_bytes(value), "confirmed");
        }
    }
}
