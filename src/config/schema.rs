//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits so the effective configuration can be logged
//! at startup.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Upstream daemon settings.
    pub upstream: UpstreamConfig,

    /// Paths served by the proxy.
    pub routes: RoutesConfig,

    /// RPC whitelist settings.
    pub whitelist: WhitelistConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Logging, error reporting and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address.
    pub bind_address: SocketAddr,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

/// Upstream daemon configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the daemon (scheme and authority only).
    pub host: Url,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Time allowed for the upstream to send response headers, in seconds.
    pub response_timeout_secs: u64,

    /// Maximum pause between two response body chunks, in seconds.
    pub body_idle_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }

    pub fn body_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.body_idle_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: Url::parse("http://127.0.0.1:9091").expect("static URL is valid"),
            connect_timeout_secs: 5,
            response_timeout_secs: 60,
            body_idle_timeout_secs: 60,
        }
    }
}

/// Paths handled by the dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Web UI path, forwarded without inspection.
    pub web_path: String,

    /// RPC endpoint, validated before forwarding.
    pub rpc_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            web_path: "/transmission/web/".to_string(),
            rpc_path: "/transmission/rpc".to_string(),
        }
    }
}

/// Whitelist configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WhitelistConfig {
    /// Every location argument must start with this prefix.
    pub download_prefix: String,
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum RPC request body size in bytes.
    pub max_rpc_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_rpc_body_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Report error details to clients instead of an opaque error id.
    pub debug_mode: bool,

    /// Log output format.
    pub log_format: LogFormat,

    /// Default log filter, overridden by `RUST_LOG`.
    pub log_level: String,

    /// Prometheus endpoint bind address; disabled when unset.
    pub metrics_address: Option<SocketAddr>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            log_format: LogFormat::Json,
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}
