//! RPC method and argument whitelist.
//!
//! # Data Flow
//! ```text
//! RpcRequest { method, arguments, tag }
//!     → registry.rs (method lookup)
//!     → arguments.rs (per-key filtering, fail fast)
//!     → field.rs (Any / PrefixedLocation)
//!     → filtered RpcRequest, ready for re-serialization
//! ```
//!
//! # Design Decisions
//! - Whitelist compiled at startup from the download prefix, immutable at runtime
//! - Field rules are a closed enum, matched exhaustively
//! - Validation never mutates its input

pub mod arguments;
pub mod field;
pub mod methods;
pub mod registry;

pub use arguments::{ArgumentError, ArgumentsValidator, SkippedField, ValidatedArguments};
pub use field::{FieldError, FieldValidator};
pub use registry::{ValidationError, ValidatorRegistry};
