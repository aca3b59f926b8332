pub mod client;
pub mod config;
pub mod logging;
pub mod tun;

use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum TunsinkError {
    #[error("Opening {}: {source}", .path.display())]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ioctl(TUNSETIFF) for {name}: {source}")]
    DeviceBind {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("Reading from TUN device: {0}")]
    Read(#[source] io::Error),
    #[error("Interface activation `{command}` failed: {reason}")]
    Activation { command: String, reason: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TunsinkError>;

pub use client::{DiscardSink, IngestLoop, IngestReport, PacketBuffer, PacketSink};
pub use config::ClientConfig;
pub use tun::{TunConfig, TunDevice};
