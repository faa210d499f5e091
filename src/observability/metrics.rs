//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by route, status
//! - `proxy_request_duration_seconds` (histogram): latency by route
//! - `proxy_rpc_rejected_total` (counter): refused RPC calls by method, reason
//! - `proxy_rpc_skipped_fields_total` (counter): dropped arguments by method
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("proxy_requests_total", "route" => route, "status" => status.to_string()).increment(1);
    histogram!("proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rejected(method: &str, reason: &'static str) {
    counter!(
        "proxy_rpc_rejected_total",
        "method" => method.to_string(),
        "reason" => reason
    )
    .increment(1);
}

pub fn record_skipped_field(method: &str) {
    counter!("proxy_rpc_skipped_fields_total", "method" => method.to_string()).increment(1);
}
