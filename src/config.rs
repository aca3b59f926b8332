use crate::tun::{TunConfig, IFNAMSIZ};
use crate::{Result, TunsinkError};
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub network: NetworkSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub tun_name: String,
    pub tun_ip: String,
    /// Run `ip` to bring the interface up and assign `tun_ip`.
    pub activate: bool,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        let tun = TunConfig::default();
        Self {
            tun_name: tun.name,
            tun_ip: tun.address,
            activate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl ClientConfig {
    /// Reads and parses a TOML file. Missing sections keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TunsinkError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| TunsinkError::Config(e.to_string()))
    }

    /// Checks the interface name fits `IFNAMSIZ` and `tun_ip` is IPv4 CIDR.
    pub fn validate(&self) -> Result<()> {
        validate_interface_name(&self.network.tun_name)?;
        parse_cidr(&self.network.tun_ip)?;
        Ok(())
    }

    pub fn tun_config(&self) -> TunConfig {
        TunConfig {
            name: self.network.tun_name.clone(),
            address: self.network.tun_ip.clone(),
        }
    }
}

/// Only rejects names that cannot fit the request; everything else,
/// including an empty name (the kernel picks `tunN`), is left to `TUNSETIFF`.
fn validate_interface_name(name: &str) -> Result<()> {
    if name.contains('\0') {
        return Err(TunsinkError::Config(format!("Interface name contains NUL: {:?}", name)));
    }
    if name.len() >= IFNAMSIZ {
        return Err(TunsinkError::Config(format!(
            "Interface name {} longer than {} bytes",
            name,
            IFNAMSIZ - 1
        )));
    }
    Ok(())
}

/// Parses CIDR notation such as "10.8.0.2/24".
pub fn parse_cidr(cidr: &str) -> Result<(Ipv4Addr, u8)> {
    let (addr, prefix) = cidr
        .split_once('/')
        .ok_or_else(|| TunsinkError::Config(format!("Invalid CIDR notation: {}", cidr)))?;

    let ip_addr: Ipv4Addr = addr
        .parse()
        .map_err(|e| TunsinkError::Config(format!("Invalid IP address: {}", e)))?;

    let prefix_len: u8 = prefix
        .parse()
        .map_err(|e| TunsinkError::Config(format!("Invalid prefix length: {}", e)))?;

    if prefix_len > 32 {
        return Err(TunsinkError::Config(format!("Invalid prefix length: {}", prefix_len)));
    }

    Ok((ip_addr, prefix_len))
}
