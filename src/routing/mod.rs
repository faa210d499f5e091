//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (clean, redirect, route lookup)
//!     → matcher.rs (exact / subtree patterns)
//!     → Return: route kind, redirect, or not-found
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same path always resolves the same way

pub mod matcher;
pub mod router;

pub use router::{Resolution, RouteKind, Router};
