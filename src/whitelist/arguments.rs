//! Per-method argument filtering.
//!
//! # Design Decisions
//! - Fail fast: the first refused argument rejects the whole request
//! - The inbound map is never mutated; a filtered copy is returned
//! - Unknown keys are either dropped (recorded as [`SkippedField`]) or
//!   rejected, depending on `error_on_unknown`

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

use super::field::{FieldError, FieldValidator};

/// Why an argument map was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("{source}")]
    BadArgument {
        field: String,
        #[source]
        source: FieldError,
    },

    #[error("forbidden argument: {field}")]
    ForbiddenField { field: String },
}

impl ArgumentError {
    /// Name of the argument that caused the rejection.
    pub fn field(&self) -> &str {
        match self {
            Self::BadArgument { field, .. } | Self::ForbiddenField { field } => field,
        }
    }
}

/// Non-fatal diagnostic: an unknown argument was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    pub field: String,
}

impl std::fmt::Display for SkippedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skipped unknown field \"{}\"", self.field)
    }
}

/// Arguments that passed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArguments {
    pub arguments: Map<String, Value>,
    pub skipped: Vec<SkippedField>,
}

/// Whitelist of arguments accepted by one RPC method.
#[derive(Debug, Clone, Default)]
pub struct ArgumentsValidator {
    arguments: HashMap<&'static str, FieldValidator>,
    error_on_unknown: bool,
}

impl ArgumentsValidator {
    /// Validator that drops unknown arguments.
    pub fn new<I>(arguments: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, FieldValidator)>,
    {
        Self {
            arguments: arguments.into_iter().collect(),
            error_on_unknown: false,
        }
    }

    /// Validator that accepts no arguments at all (unknown ones are dropped).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reject unknown arguments instead of dropping them.
    pub fn strict(mut self) -> Self {
        self.error_on_unknown = true;
        self
    }

    pub fn error_on_unknown(&self) -> bool {
        self.error_on_unknown
    }

    pub fn allows(&self, key: &str) -> bool {
        self.arguments.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Validate `arguments`, returning the filtered copy to forward.
    pub fn validate(
        &self,
        arguments: &Map<String, Value>,
    ) -> Result<ValidatedArguments, ArgumentError> {
        let mut validated = ValidatedArguments::default();

        for (key, value) in arguments {
            match self.arguments.get(key.as_str()) {
                Some(rule) => {
                    rule.validate(value).map_err(|source| ArgumentError::BadArgument {
                        field: key.clone(),
                        source,
                    })?;
                    validated.arguments.insert(key.clone(), value.clone());
                }
                None if self.error_on_unknown => {
                    return Err(ArgumentError::ForbiddenField { field: key.clone() });
                }
                None => validated.skipped.push(SkippedField { field: key.clone() }),
            }
        }

        Ok(validated)
    }

    /// Every argument in `arguments` that [`validate`](Self::validate) would
    /// drop, whether or not the request as a whole is accepted.
    pub fn skipped_fields(&self, arguments: &Map<String, Value>) -> Vec<SkippedField> {
        if self.error_on_unknown {
            return Vec::new();
        }
        arguments
            .keys()
            .filter(|key| !self.allows(key))
            .map(|key| SkippedField { field: key.clone() })
            .collect()
    }
}
