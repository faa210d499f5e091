//! Transmission RPC envelope.

pub mod request;

pub use request::{ParseError, RpcRequest, RpcTag};
