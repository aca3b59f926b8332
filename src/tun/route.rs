use crate::{Result, TunsinkError};
use std::process::Command;

/// Brings a freshly bound interface up and gives it an address.
pub trait InterfaceActivator {
    fn activate(&self, interface: &str, cidr: &str) -> Result<()>;
}

/// Runs iproute2:
/// `ip link set <if> up` then `ip addr add <cidr> dev <if>`.
#[derive(Debug, Clone)]
pub struct IpCommandActivator {
    program: String,
}

impl IpCommandActivator {
    pub fn new() -> Self {
        Self::with_program("ip")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        let command = format!("{} {}", self.program, args.join(" "));
        log::debug!("Running {}", command);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| TunsinkError::Activation {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TunsinkError::Activation {
                command,
                reason: format!("{} ({})", output.status, stderr.trim()),
            });
        }
        Ok(())
    }
}

impl Default for IpCommandActivator {
    fn default() -> Self {
        Self::new()
    }
}

impl InterfaceActivator for IpCommandActivator {
    fn activate(&self, interface: &str, cidr: &str) -> Result<()> {
        self.run(&["link", "set", interface, "up"])?;
        self.run(&["addr", "add", cidr, "dev", interface])?;
        log::info!("Interface {} up with address {}", interface, cidr);
        Ok(())
    }
}

/// Leaves the interface as the kernel created it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopActivator;

impl InterfaceActivator for NoopActivator {
    fn activate(&self, interface: &str, _cidr: &str) -> Result<()> {
        log::debug!("Activation of {} skipped", interface);
        Ok(())
    }
}
