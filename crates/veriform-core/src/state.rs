//! Form state and the operations that evolve it.
//!
//! A [`FormState`] lives for one form session. Every operation consumes the
//! state and returns the next one; the [`FormSchema`] is passed in
//! explicitly and never stored. Misuse (unknown fields, values that do not
//! match the schema) is reported as [`FormError`]. Validation failures are
//! ordinary data in [`FormState::errors`].

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::{FormError, Result, ValidationErrors};
use crate::schema::FormSchema;
use crate::value::{FieldValue, FormValues};

/// State of one form session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    values: FormValues,
    touched: BTreeSet<String>,
    errors: ValidationErrors,
    submit_count: u32,
    #[serde(skip)]
    initial_values: FormValues,
}

impl FormState {
    /// Starts a session from initial values.
    ///
    /// The keys of `values` must match the schema's fields exactly.
    pub fn initialize(schema: &FormSchema, values: FormValues) -> Result<Self> {
        let missing: Vec<String> = schema
            .field_names()
            .filter(|name| !values.contains_key(*name))
            .map(str::to_string)
            .collect();
        let unexpected: Vec<String> = values
            .keys()
            .filter(|name| !schema.contains(name))
            .cloned()
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(FormError::SchemaMismatch {
                missing,
                unexpected,
            });
        }

        let errors = schema.validate_all(&values);
        debug!(
            fields = schema.len(),
            errors = errors.len(),
            "form session started"
        );
        Ok(Self {
            initial_values: values.clone(),
            values,
            touched: BTreeSet::new(),
            errors,
            submit_count: 0,
        })
    }

    /// Replaces a field's value and recomputes that field's error.
    ///
    /// Date text that parses is stored as a date, so `on_valid` always sees
    /// dates for date fields.
    pub fn set_value(
        mut self,
        schema: &FormSchema,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Self> {
        let field = schema.require(name)?;
        let value = field.kind.normalize(value.into());
        let error = field.validate(&value);
        trace!(field = name, error = ?error, "value changed");
        self.errors.set(name, error);
        self.values.insert(name.to_string(), value);
        Ok(self)
    }

    /// Marks a field as touched. Touching a field twice has no further effect.
    pub fn set_touched(mut self, schema: &FormSchema, name: &str) -> Result<Self> {
        schema.require(name)?;
        if self.touched.insert(name.to_string()) {
            trace!(field = name, "field touched");
        }
        Ok(self)
    }

    /// Attempts to submit the form.
    ///
    /// Every field is revalidated and marked touched, and the submit count
    /// goes up. `on_valid` runs with the complete values only when no field
    /// has an error; otherwise it is not called and the fresh errors are left
    /// in the returned state.
    pub fn submit<F>(mut self, schema: &FormSchema, on_valid: F) -> Self
    where
        F: FnOnce(&FormValues),
    {
        self.errors = schema.validate_all(&self.values);
        self.touched.extend(schema.field_names().map(str::to_string));
        self.submit_count = self.submit_count.saturating_add(1);

        if self.errors.is_empty() {
            info!(attempt = self.submit_count, "form submitted");
            on_valid(&self.values);
        } else {
            debug!(
                attempt = self.submit_count,
                errors = self.errors.len(),
                "submit rejected"
            );
        }
        self
    }

    /// Starts a new session from this session's initial values.
    pub fn reset(self, schema: &FormSchema) -> Result<Self> {
        Self::initialize(schema, self.initial_values)
    }

    /// Returns the current values.
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// Returns the current value of a field.
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Returns the values the session started with.
    pub const fn initial_values(&self) -> &FormValues {
        &self.initial_values
    }

    /// Returns the touched fields.
    pub const fn touched(&self) -> &BTreeSet<String> {
        &self.touched
    }

    /// Returns whether a field has been touched.
    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Returns the current errors.
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Returns the current error of a field.
    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    /// Returns a field's error only once the field has been touched.
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.is_touched(name) {
            self.error(name)
        } else {
            None
        }
    }

    /// Returns the number of submit attempts.
    pub const fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Returns whether no field has an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns whether any value differs from its initial value.
    pub fn is_dirty(&self) -> bool {
        self.values != self.initial_values
    }
}
