pub mod device;
pub mod ifreq;
pub mod route;

/// Control node used to create and attach tun interfaces.
pub const TUN_CONTROL_PATH: &str = "/dev/net/tun";

/// Kernel limit on interface names, terminating NUL included.
pub const IFNAMSIZ: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunConfig {
    pub name: String,
    pub address: String,  // CIDR, e.g. "10.8.0.2/24"
}

impl Default for TunConfig {
    fn default() -> Self {
        Self {
            name: "tun0".to_string(),
            address: "10.8.0.2/24".to_string(),
        }
    }
}

pub use device::{provision, KernelBackend, TunBackend, TunDevice};
pub use ifreq::IfReq;
pub use route::{InterfaceActivator, IpCommandActivator, NoopActivator};
