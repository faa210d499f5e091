//! Request hygiene applied while relaying.
//!
//! Argument-level policy lives in [`crate::whitelist`]; this module only deals
//! with HTTP-level concerns.

pub mod headers;
