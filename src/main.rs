//! transmission-proxy
//!
//! A reverse proxy that sits in front of a Transmission daemon and only lets
//! whitelisted RPC calls through.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                 TRANSMISSION PROXY               │
//!                     │                                                  │
//!   Client Request    │  ┌──────────┐   ┌─────────┐   ┌──────────────┐   │
//!  ───────────────────┼─▶│ routing  │──▶│   rpc   │──▶│  whitelist   │   │
//!                     │  │dispatcher│   │ envelope│   │  registry    │   │
//!                     │  └────┬─────┘   └─────────┘   └──────┬───────┘   │
//!                     │       │ web / root                   │ filtered  │
//!                     │       ▼                              ▼           │
//!   Client Response   │  ┌─────────────────────────────────────────┐     │
//!  ◀──────────────────┼──│        forwarder (no redirects)         │◀────┼──── Transmission
//!                     │  └─────────────────────────────────────────┘     │
//!                     │                                                  │
//!                     │  any failure → error responder (correlation id)  │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use transmission_proxy::config::Cli;
use transmission_proxy::lifecycle::startup;
use transmission_proxy::observability::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, &cli.log_level);

    tracing::info!("transmission-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.host,
        debug_mode = config.observability.debug_mode,
        "Configuration loaded"
    );

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "aborting");
            ExitCode::FAILURE
        }
    }
}
