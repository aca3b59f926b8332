use super::{IngestLoop, IngestReport};
use crate::config::ClientConfig;
use crate::tun::{provision, InterfaceActivator, TunBackend};
use crate::Result;

/// Binds the configured interface through `backend`, hands it to
/// `activator` and drains it until the first read error.
///
/// Returns `Err` only when provisioning fails. An activation failure is
/// logged and the loop still runs.
pub fn run_client<B: TunBackend>(
    backend: &B,
    config: &ClientConfig,
    activator: &dyn InterfaceActivator,
) -> Result<IngestReport> {
    let tun = config.tun_config();
    let device = provision(backend, &tun.name).map_err(|e| {
        log::error!("{}", e);
        log::error!("Failed to create TUN device");
        e
    })?;

    if let Err(e) = activator.activate(device.name(), &tun.address) {
        log::warn!("{} (no traffic will reach {})", e, device.name());
    }

    let report = IngestLoop::new(device).run();
    log::info!(
        "Ingestion stopped after {} packets ({} bytes): {}",
        report.packets,
        report.bytes,
        report.error
    );
    Ok(report)
}

/// Process exit status for a finished client: 1 if the device could not be
/// provisioned, otherwise 0.
///
/// A read error that ends ingestion still maps to 0.
pub fn exit_status(outcome: &Result<IngestReport>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
