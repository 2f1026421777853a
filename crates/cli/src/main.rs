use clap::Parser;
use dns_sidecar::cli::Cli;
use dns_sidecar::{bootstrap, signals, Supervisor};
use std::process::ExitCode;
use tracing::{error, info};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match bootstrap::load_config(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            bootstrap::init_fallback_logging();
            error!(error = %e, "Invalid configuration");
            return ExitCode::from(e.exit_code());
        }
    };

    if let Err(e) = bootstrap::init_logging(&config.logging) {
        eprintln!("dns-sidecar: {e:#}");
        return ExitCode::FAILURE;
    }

    info!("Starting DNS sidecar v{}", env!("CARGO_PKG_VERSION"));

    let result = match signals::ShutdownSignals::install() {
        Ok(signals) => match Supervisor::bind(&config).await {
            Ok(supervisor) => supervisor.run_until(signals.recv()).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            info!("Sidecar shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Sidecar stopped on fatal error");
            ExitCode::from(e.exit_code())
        }
    }
}
