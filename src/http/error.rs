//! Error responses.
//!
//! # Responsibilities
//! - Map proxy failures to HTTP status codes and log levels
//! - Assign each failure a correlation id and log it with its source location
//! - Render `{"tag", "result"}` bodies, verbose only in debug mode

use std::panic::Location;
use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::rpc::ParseError;
use crate::whitelist::ValidationError;

/// Every way a proxied request can fail.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("cannot unmarshal RPC request: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot serialize RPC request: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("cannot build upstream URL: {0}")]
    UpstreamUri(#[source] axum::http::Error),

    #[error("upstream error: {0}")]
    Upstream(#[source] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0:?}")]
    UpstreamTimeout(Duration),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Parse(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Serialization(_) | Self::UpstreamUri(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Severity used when logging this error.
    pub fn level(&self) -> tracing::Level {
        if self.status().is_server_error() {
            tracing::Level::ERROR
        } else {
            tracing::Level::WARN
        }
    }

    /// Key/value details attached to the log entry and, in debug mode, the response.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Validation(ValidationError::UnknownMethod { method }) => {
                vec![("method", method.clone())]
            }
            Self::Validation(ValidationError::Argument { method, source }) => {
                vec![("method", method.clone()), ("argument", source.field().to_string())]
            }
            _ => Vec::new(),
        }
    }
}

/// Opaque id linking a client-visible error to its log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<i64>,
    result: String,
}

/// Turns failures into logged, client-safe JSON responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorResponder {
    debug_mode: bool,
}

impl ErrorResponder {
    pub fn new(debug_mode: bool) -> Self {
        Self { debug_mode }
    }

    /// Log `err` and build the response for it. `tag` 0 means no tag.
    #[track_caller]
    pub fn respond(&self, err: &ProxyError, tag: i64) -> Response {
        let err_id = CorrelationId::new();
        let attributes = err.attributes();
        log_error(err, err_id, &attributes, Location::caller());

        let result = if self.debug_mode {
            debug_message(&err.to_string(), &attributes)
        } else {
            format!("Unknown error occurred while processing your request. Error ID: {err_id}")
        };

        let body = ErrorBody {
            tag: (tag != 0).then_some(tag),
            result,
        };

        let mut response = match serde_json::to_vec(&body) {
            Ok(bytes) => (
                err.status(),
                [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                bytes,
            )
                .into_response(),
            Err(e) => {
                tracing::warn!(error = %e, err_id = %err_id, "cannot marshal error response body");
                (
                    err.status(),
                    [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
                    "unknown error",
                )
                    .into_response()
            }
        };
        response
            .headers_mut()
            .insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        response
    }
}

fn log_error(
    err: &ProxyError,
    err_id: CorrelationId,
    attributes: &[(&'static str, String)],
    source: &Location<'_>,
) {
    let attrs = attributes
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ");
    let status = err.status().as_u16();

    if err.level() == tracing::Level::ERROR {
        tracing::error!(
            error = ?err,
            err_id = %err_id,
            status,
            attributes = %attrs,
            source.file = source.file(),
            source.line = source.line(),
            "{err}"
        );
    } else {
        tracing::warn!(
            error = ?err,
            err_id = %err_id,
            status,
            attributes = %attrs,
            source.file = source.file(),
            source.line = source.line(),
            "{err}"
        );
    }
}

/// Message shown in debug mode: capitalized, followed by `, key: value` pairs.
fn debug_message(message: &str, attributes: &[(&'static str, String)]) -> String {
    let mut chars = message.chars();
    let mut result = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    for (key, value) in attributes {
        result.push_str(", ");
        result.push_str(key);
        result.push_str(": ");
        result.push_str(value);
    }
    result
}
