//! Per-argument validation rules.

use serde_json::Value;
use thiserror::Error;

/// Why a single argument value was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("must be string")]
    WrongType,

    #[error("forbidden location")]
    ForbiddenLocation,
}

/// Rule applied to the value of one whitelisted argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValidator {
    /// Accept any JSON value.
    Any,
    /// Value must be a string starting with `prefix`.
    PrefixedLocation { prefix: String },
}

impl FieldValidator {
    pub fn prefixed_location(prefix: impl Into<String>) -> Self {
        Self::PrefixedLocation {
            prefix: prefix.into(),
        }
    }

    /// Check `value` against this rule.
    pub fn validate(&self, value: &Value) -> Result<(), FieldError> {
        match self {
            Self::Any => Ok(()),
            Self::PrefixedLocation { prefix } => match value {
                Value::String(location) if location.starts_with(prefix.as_str()) => Ok(()),
                Value::String(_) => Err(FieldError::ForbiddenLocation),
                _ => Err(FieldError::WrongType),
            },
        }
    }
}
