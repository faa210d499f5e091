//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, dispatch by path)
//!     → rpc.rs (RPC path only: parse, whitelist, re-encode)
//!     → forward.rs (rewrite URI, send upstream, stream response back)
//!     → error.rs (any failure: log with correlation id, JSON error body)
//! ```

pub mod error;
pub mod forward;
pub mod response;
pub mod rpc;
pub mod server;

pub use error::{CorrelationId, ErrorResponder, ProxyError};
pub use forward::{Forwarder, ForwarderError};
pub use server::{AppState, HttpServer, ServerError};
