//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when configured
//! - Build the server from the validated configuration
//! - Bind the listener last, then serve until a signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the proxy until SIGINT/SIGTERM.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    if let Some(addr) = config.observability.metrics_address {
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address;
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            addr: bind_address,
            source,
        })?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
