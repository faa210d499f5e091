//! Method lookup.
//!
//! # Design Decisions
//! - Built once at startup, immutable at runtime (shared via `Arc`, no locks)
//! - Unknown methods are rejected, never forwarded
//! - Errors carry the method name for logging

use std::collections::HashMap;

use thiserror::Error;

use super::arguments::{ArgumentError, ArgumentsValidator, SkippedField};
use super::methods::default_methods;
use crate::observability::metrics;
use crate::rpc::RpcRequest;

/// Why an RPC request was refused by the whitelist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown method")]
    UnknownMethod { method: String },

    #[error("{source}")]
    Argument {
        method: String,
        #[source]
        source: ArgumentError,
    },
}

impl ValidationError {
    pub fn method(&self) -> &str {
        match self {
            Self::UnknownMethod { method } | Self::Argument { method, .. } => method,
        }
    }

    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnknownMethod { .. } => "unknown_method",
            Self::Argument {
                source: ArgumentError::BadArgument { .. },
                ..
            } => "bad_argument",
            Self::Argument {
                source: ArgumentError::ForbiddenField { .. },
                ..
            } => "forbidden_field",
        }
    }
}

/// Immutable map of whitelisted RPC methods.
#[derive(Debug, Clone, Default)]
pub struct ValidatorRegistry {
    methods: HashMap<&'static str, ArgumentsValidator>,
}

impl ValidatorRegistry {
    pub fn new<I>(methods: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, ArgumentsValidator)>,
    {
        Self {
            methods: methods.into_iter().collect(),
        }
    }

    /// The default Transmission whitelist, confining locations to `download_prefix`.
    pub fn with_default_methods(download_prefix: &str) -> Self {
        Self::new(default_methods(download_prefix))
    }

    pub fn get(&self, method: &str) -> Option<&ArgumentsValidator> {
        self.methods.get(method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Validate `request`, returning the copy that may be forwarded upstream.
    pub fn validate(&self, request: &RpcRequest) -> Result<RpcRequest, ValidationError> {
        let validator = self
            .get(&request.method)
            .ok_or_else(|| ValidationError::UnknownMethod {
                method: request.method.clone(),
            })?;

        let validated = match validator.validate(&request.arguments) {
            Ok(validated) => validated,
            Err(source) => {
                log_skipped(&request.method, &validator.skipped_fields(&request.arguments));
                return Err(ValidationError::Argument {
                    method: request.method.clone(),
                    source,
                });
            }
        };
        log_skipped(&request.method, &validated.skipped);

        Ok(RpcRequest {
            method: request.method.clone(),
            arguments: validated.arguments,
            tag: request.tag,
        })
    }
}

fn log_skipped(method: &str, skipped: &[SkippedField]) {
    for field in skipped {
        tracing::info!(method, field = %field.field, "while validating rpc method: {field}");
        metrics::record_skipped_field(method);
    }
}
