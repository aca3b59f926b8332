//! tunsink - bind a tun interface and drain the IP packets the kernel routes
//! into it.
//!
//! Usage:
//!   tunsink
//!   tunsink --config /etc/tunsink.toml --tun tun1

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tunsink::client::{exit_status, run_client};
use tunsink::tun::{InterfaceActivator, IpCommandActivator, KernelBackend, NoopActivator};
use tunsink::ClientConfig;

#[derive(Parser, Debug)]
#[command(name = "tunsink")]
#[command(about = "Creates a TUN interface and reports every packet read from it", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// TUN interface name, overrides network.tun_name
    #[arg(long)]
    tun: Option<String>,
}

fn load_config(cli: &Cli) -> tunsink::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(name) = &cli.tun {
        config.network.tun_name = name.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("tunsink: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tunsink::logging::init(&config.logging.level);

    let activator: Box<dyn InterfaceActivator> = if config.network.activate {
        Box::new(IpCommandActivator::new())
    } else {
        Box::new(NoopActivator)
    };

    let outcome = run_client(&KernelBackend::default(), &config, activator.as_ref());
    ExitCode::from(exit_status(&outcome))
}
