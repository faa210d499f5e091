//! RPC envelope decoding and re-encoding.
//!
//! # Responsibilities
//! - Read the inbound body exactly once, within a size bound
//! - Decode `{"method", "arguments", "tag"}`
//! - Re-encode the validated request for forwarding

use axum::body::{Body, Bytes};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why an inbound body could not be turned into an [`RpcRequest`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("read body: {0}")]
    Read(#[source] axum::Error),

    #[error("parse body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A Transmission RPC request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub arguments: Map<String, Value>,

    /// Caller-chosen correlation tag, 0 when absent or `null`.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_absent_tag"
    )]
    pub tag: i64,
}

/// Tag of the RPC request being proxied, stored in the request extensions so
/// failures after validation can still echo it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RpcTag(pub i64);

impl RpcRequest {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Consume `body` and decode it, reading at most `limit` bytes.
    pub async fn from_body(body: Body, limit: usize) -> Result<Self, ParseError> {
        let bytes = axum::body::to_bytes(body, limit)
            .await
            .map_err(ParseError::Read)?;
        Self::from_slice(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }
}

fn is_absent_tag(tag: &i64) -> bool {
    *tag == 0
}

/// `null` reads as the field's zero value, the same as leaving it out.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
