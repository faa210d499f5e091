//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment variables / long flags
//!     → loader.rs (clap parse)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → passed by value to the registry, forwarder and server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no reload
//! - All optional fields have defaults
//! - Validation separates syntactic (clap/url) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{Cli, ConfigError};
pub use schema::{
    LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, RoutesConfig,
    UpstreamConfig, WhitelistConfig,
};
