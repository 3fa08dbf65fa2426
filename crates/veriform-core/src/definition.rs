//! Declarative form definitions loaded from JSON.
//!
//! A definition lists the fields of a form together with their rules and
//! initial values:
//!
//! ```json
//! {
//!   "title": "Sign up",
//!   "fields": [
//!     { "name": "email", "kind": "email", "required": true,
//!       "required_message": "Email is required" },
//!     { "name": "terms", "kind": "boolean-true",
//!       "kind_message": "Please accept the terms", "initial": false }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};
use crate::schema::{FieldKind, FieldSchema, FormSchema};
use crate::validation::{MaxLengthValidator, MinLengthValidator, OneOfValidator, RegexValidator};
use crate::value::{FieldValue, FormValues};

/// A complete form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    /// Form title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Fields in display order.
    pub fields: Vec<FieldDefinition>,
}

/// Definition of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Overrides the default required message; implies `required`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_message: Option<String>,
    /// Allowed values as raw JSON, cast according to `kind`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of_message: Option<String>,
    /// Initial value as raw JSON, cast according to `kind`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<serde_json::Value>,
}

impl FieldDefinition {
    /// Builds the schema of this field.
    pub fn to_schema(&self) -> Result<FieldSchema> {
        let mut field = FieldSchema::new(&self.name, self.kind);

        if let Some(label) = &self.label {
            field = field.label(label);
        }
        if let Some(message) = &self.required_message {
            field = field.required_message(message);
        } else if self.required {
            field = field.required();
        }
        if let Some(message) = &self.kind_message {
            field = field.kind_message(message);
        }
        if let Some(min) = self.min_length {
            field = field.validator(MinLengthValidator::new(min));
        }
        if let Some(max) = self.max_length {
            field = field.validator(MaxLengthValidator::new(max));
        }
        if let Some(pattern) = &self.pattern {
            let message = self
                .pattern_message
                .clone()
                .unwrap_or_else(|| "Enter a valid value.".to_string());
            field = field.validator(RegexValidator::new(pattern, message)?);
        }
        if let Some(allowed) = &self.one_of {
            let allowed = allowed.iter().map(|raw| self.kind.cast(raw)).collect();
            let validator = match &self.one_of_message {
                Some(message) => OneOfValidator::with_message(allowed, message),
                None => OneOfValidator::new(allowed),
            };
            field = field.validator(validator);
        }

        Ok(field)
    }

    /// Returns the initial value, or the kind's blank value if none is set.
    pub fn initial_value(&self) -> FieldValue {
        self.initial
            .as_ref()
            .map_or_else(|| self.kind.empty_value(), |raw| self.kind.cast(raw))
    }
}

impl FormDefinition {
    /// Parses a definition from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a definition from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the definition as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the form schema.
    pub fn to_schema(&self) -> Result<FormSchema> {
        self.fields
            .iter()
            .try_fold(FormSchema::builder(), |builder, field| {
                Ok::<_, FormError>(builder.field(field.to_schema()?))
            })?
            .build()
    }

    /// Returns the initial values of every field.
    pub fn initial_values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.initial_value()))
            .collect()
    }

    /// Casts raw JSON values to the kinds of the named fields.
    pub fn cast_values(
        &self,
        raw: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<FormValues> {
        raw.iter()
            .map(|(name, value)| {
                let field = self
                    .field(name)
                    .ok_or_else(|| FormError::UnknownField(name.clone()))?;
                Ok((name.clone(), field.kind.cast(value)))
            })
            .collect()
    }

    /// Returns the definition of a field.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }
}
