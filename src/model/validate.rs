//! Field-level validation accumulator.
//!
//! # Responsibility
//! - Collect named rule violations into one field -> message mapping.
//! - Give callers per-field feedback instead of a single opaque message.
//!
//! # Invariants
//! - A `Validator` is a plain per-call value, no shared state.
//! - Field names are unique; the first message recorded for a field wins.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structured validation failure carrying a field -> message map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    errors: BTreeMap<String, String>,
}

impl ValidationError {
    /// Returns the full field -> message mapping.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Returns the message recorded for one field, if any.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed:")?;
        for (field, message) in &self.errors {
            write!(f, " {field}: {message};")?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Per-call accumulator for validation rules.
#[derive(Debug, Default)]
pub struct Validator {
    errors: BTreeMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` under `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: impl Into<String>, message: impl Into<String>) {
        if !ok {
            self.errors.entry(field.into()).or_insert_with(|| message.into());
        }
    }

    /// Merges another failure into this accumulator, prefixing its field names.
    ///
    /// Used by batch operations to report which entry violated a rule,
    /// e.g. `holds[2].vertices[0].x`.
    pub fn absorb_prefixed(&mut self, prefix: &str, error: ValidationError) {
        for (field, message) in error.errors {
            self.errors
                .entry(format!("{prefix}.{field}"))
                .or_insert(message);
        }
    }

    /// Finishes accumulation, yielding `Err` when any rule was violated.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                errors: self.errors,
            })
        }
    }
}
