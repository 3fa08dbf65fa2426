//! Error types for forms.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Errors raised when a form is driven incorrectly.
///
/// Per-field validation failures are not errors in this sense; they are
/// reported as data through [`ValidationErrors`].
#[derive(Debug, Error)]
pub enum FormError {
    /// The initial values do not cover exactly the declared fields.
    #[error("values do not match schema: missing {missing:?}, unexpected {unexpected:?}")]
    SchemaMismatch {
        /// Declared fields with no value.
        missing: Vec<String>,
        /// Values with no declared field.
        unexpected: Vec<String>,
    },

    /// The field is not declared in the schema.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A field name was declared twice.
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    /// A pattern in a form definition does not compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// IO error while reading a form definition.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A form definition could not be parsed.
    #[error("failed to parse form definition: {0}")]
    Definition(#[from] serde_json::Error),
}

/// Current validation error of each field, keyed by field name.
///
/// A field with no entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Records the outcome of validating a field, clearing any previous error.
    pub fn set(&mut self, field: &str, error: Option<String>) {
        match error {
            Some(message) => {
                self.errors.insert(field.to_string(), message);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the error for a specific field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Returns whether the field currently has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Iterates over `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, message) in &self.errors {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
