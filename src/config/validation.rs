//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap and url handle syntax)
//! - Download prefix must be an absolute directory path
//! - Upstream must be a bare http(s) base URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("DOWNLOAD_PREFIX must begin with /")]
    PrefixNotAbsolute,

    #[error("DOWNLOAD_PREFIX must end with /")]
    PrefixNotDirectory,

    #[error("UPSTREAM_HOST must use http or https, got {0}")]
    UpstreamScheme(String),

    #[error("UPSTREAM_HOST must define a host")]
    UpstreamNoHost,

    #[error("UPSTREAM_HOST must not define path")]
    UpstreamPath,

    #[error("UPSTREAM_HOST must not define query")]
    UpstreamQuery,

    #[error("{name} must begin with /, got {value:?}")]
    RouteNotAbsolute { name: &'static str, value: String },

    #[error("WEB_PATH and RPC_PATH must differ")]
    RoutesCollide,

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.whitelist.download_prefix;
    if !prefix.starts_with('/') {
        errors.push(ValidationError::PrefixNotAbsolute);
    }
    if !prefix.ends_with('/') {
        errors.push(ValidationError::PrefixNotDirectory);
    }

    let upstream = &config.upstream.host;
    if !matches!(upstream.scheme(), "http" | "https") {
        errors.push(ValidationError::UpstreamScheme(upstream.scheme().to_string()));
    }
    if upstream.host_str().map_or(true, str::is_empty) {
        errors.push(ValidationError::UpstreamNoHost);
    }
    if !matches!(upstream.path(), "" | "/") {
        errors.push(ValidationError::UpstreamPath);
    }
    if upstream.query().is_some() {
        errors.push(ValidationError::UpstreamQuery);
    }

    for (name, value) in [
        ("WEB_PATH", &config.routes.web_path),
        ("RPC_PATH", &config.routes.rpc_path),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::RouteNotAbsolute {
                name,
                value: value.clone(),
            });
        }
    }
    if config.routes.web_path == config.routes.rpc_path {
        errors.push(ValidationError::RoutesCollide);
    }

    for (name, value) in [
        ("UPSTREAM_CONNECT_TIMEOUT_SECS", config.upstream.connect_timeout_secs),
        ("UPSTREAM_RESPONSE_TIMEOUT_SECS", config.upstream.response_timeout_secs),
        ("UPSTREAM_BODY_IDLE_TIMEOUT_SECS", config.upstream.body_idle_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero(name));
        }
    }
    if config.limits.max_rpc_body_bytes == 0 {
        errors.push(ValidationError::Zero("MAX_RPC_BODY_BYTES"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
