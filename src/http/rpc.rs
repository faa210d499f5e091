//! RPC endpoint: parse, validate, re-encode, forward.

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;

use crate::http::error::ProxyError;
use crate::http::forward::relay;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::rpc::{RpcRequest, RpcTag};
use crate::whitelist::ValidationError;

pub async fn rpc_handler(state: &AppState, request: Request<Body>) -> Response {
    let (mut parts, body) = request.into_parts();

    let rpc = match RpcRequest::from_body(body, state.max_rpc_body_bytes).await {
        Ok(rpc) => rpc,
        Err(e) => return state.responder.respond(&ProxyError::from(e), 0),
    };

    let validated = match state.registry.validate(&rpc) {
        Ok(validated) => validated,
        Err(e) => {
            // Unknown method names come from the client; keep them out of metric labels.
            let method = match &e {
                ValidationError::UnknownMethod { .. } => "unknown",
                _ => e.method(),
            };
            metrics::record_rejected(method, e.reason());
            return state.responder.respond(&ProxyError::from(e), rpc.tag);
        }
    };

    let bytes = match validated.to_bytes() {
        Ok(bytes) => bytes,
        Err(e) => return state.responder.respond(&ProxyError::Serialization(e), rpc.tag),
    };

    tracing::debug!(method = %validated.method, tag = validated.tag, "RPC request accepted");

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.extensions.insert(RpcTag(validated.tag));

    relay(&state.forwarder, &state.responder, Request::from_parts(parts, Body::from(bytes))).await
}
