//! Configuration loading from the environment.
//!
//! Every setting is read from its environment variable; the same settings are
//! accepted as long flags, which take precedence.

use std::net::SocketAddr;

use clap::{ArgAction, Parser};
use thiserror::Error;
use url::Url;

use crate::config::schema::{LogFormat, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be defined")]
    Missing(&'static str),

    #[error("failed to parse UPSTREAM_HOST: {0}")]
    UpstreamHost(#[from] url::ParseError),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw settings as given by the environment or the command line.
#[derive(Debug, Clone, Parser)]
#[command(name = "transmission-proxy")]
#[command(
    about = "Whitelisting reverse proxy for the Transmission RPC interface",
    long_about = None
)]
pub struct Cli {
    /// Every location argument must start with this prefix.
    #[arg(long, env = "DOWNLOAD_PREFIX")]
    pub download_prefix: Option<String>,

    /// Base URL of the Transmission daemon.
    #[arg(long, env = "UPSTREAM_HOST")]
    pub upstream_host: Option<String>,

    #[arg(long, env = "WEB_PATH", default_value = "/transmission/web/")]
    pub web_path: String,

    #[arg(long, env = "RPC_PATH", default_value = "/transmission/rpc")]
    pub rpc_path: String,

    /// yes/on/true enable debug mode; any other value disables it.
    #[arg(
        long,
        env = "DEBUG_MODE",
        action = ArgAction::Set,
        value_parser = parse_switch,
        default_value = "false"
    )]
    pub debug_mode: bool,

    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        ignore_case = true,
        default_value_t = LogFormat::Json
    )]
    pub log_format: LogFormat,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "METRICS_ADDRESS")]
    pub metrics_address: Option<SocketAddr>,

    #[arg(long, env = "UPSTREAM_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    pub upstream_connect_timeout_secs: u64,

    #[arg(long, env = "UPSTREAM_RESPONSE_TIMEOUT_SECS", default_value_t = 60)]
    pub upstream_response_timeout_secs: u64,

    #[arg(long, env = "UPSTREAM_BODY_IDLE_TIMEOUT_SECS", default_value_t = 60)]
    pub upstream_body_idle_timeout_secs: u64,

    #[arg(long, env = "MAX_RPC_BODY_BYTES", default_value_t = 32 * 1024 * 1024)]
    pub max_rpc_body_bytes: usize,
}

fn parse_switch(value: &str) -> Result<bool, std::convert::Infallible> {
    Ok(matches!(value.to_lowercase().as_str(), "yes" | "on" | "true"))
}

impl Cli {
    /// Build and validate the proxy configuration.
    pub fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let download_prefix =
            non_empty(self.download_prefix).ok_or(ConfigError::Missing("DOWNLOAD_PREFIX"))?;
        let upstream_host =
            non_empty(self.upstream_host).ok_or(ConfigError::Missing("UPSTREAM_HOST"))?;

        let mut config = ProxyConfig::default();
        config.whitelist.download_prefix = download_prefix;
        config.upstream.host = Url::parse(&upstream_host)?;
        config.upstream.connect_timeout_secs = self.upstream_connect_timeout_secs;
        config.upstream.response_timeout_secs = self.upstream_response_timeout_secs;
        config.upstream.body_idle_timeout_secs = self.upstream_body_idle_timeout_secs;
        config.routes.web_path = self.web_path;
        config.routes.rpc_path = self.rpc_path;
        config.limits.max_rpc_body_bytes = self.max_rpc_body_bytes;
        config.observability.debug_mode = self.debug_mode;
        config.observability.log_format = self.log_format;
        config.observability.log_level = self.log_level;
        config.observability.metrics_address = self.metrics_address;

        validate_config(&config).map_err(ConfigError::Validation)?;

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
