//! Field and form schemas.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result, ValidationErrors};
use crate::validation::{is_valid_email, PredicateValidator, Validator};
use crate::value::{parse_datetime, FieldValue, FormValues};

/// Default message when a required field is empty.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "field is required";

/// The type and format a field's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    /// Any text.
    Text,
    /// Text that looks like an email address.
    Email,
    /// A boolean that must be `true`, e.g. a terms checkbox.
    BooleanTrue,
    /// A date-time, or text that parses as one.
    Date,
    /// A list of non-empty strings, e.g. a multi-select.
    Choices,
}

impl FieldKind {
    /// Returns the message used when the kind check fails.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Text => "Enter a valid value",
            Self::Email => "Enter a valid email",
            Self::BooleanTrue => "This field must be accepted",
            Self::Date => "Enter a valid date",
            Self::Choices => "Select valid options",
        }
    }

    /// Returns the blank value of this kind.
    pub const fn empty_value(self) -> FieldValue {
        match self {
            Self::Text | Self::Email => FieldValue::Text(String::new()),
            Self::BooleanTrue => FieldValue::Bool(false),
            Self::Date => FieldValue::Date(None),
            Self::Choices => FieldValue::List(Vec::new()),
        }
    }

    /// Returns whether a value passes this kind's type and format check.
    pub fn accepts(self, value: &FieldValue) -> bool {
        match self {
            Self::Text => matches!(value, FieldValue::Text(_)),
            Self::Email => value.as_text().is_some_and(is_valid_email),
            Self::BooleanTrue => value.as_bool() == Some(true),
            Self::Date => value.as_date().is_some(),
            Self::Choices => value
                .as_list()
                .is_some_and(|items| items.iter().all(|item| !item.is_empty())),
        }
    }

    /// Brings an already-typed value into this kind's shape.
    ///
    /// Only date text is converted; anything else is returned unchanged so
    /// the kind check can report it.
    pub fn normalize(self, value: FieldValue) -> FieldValue {
        match (self, value) {
            (Self::Date, FieldValue::Text(text)) => {
                parse_datetime(&text).map_or(FieldValue::Text(text), FieldValue::from)
            }
            (_, value) => value,
        }
    }

    /// Converts raw JSON into the value this kind expects.
    ///
    /// `null` becomes the blank value and date strings are parsed when
    /// possible. Values that cannot be converted are kept as close to the
    /// input as possible so the kind check reports them.
    pub fn cast(self, raw: &serde_json::Value) -> FieldValue {
        use serde_json::Value;

        match (self, raw) {
            (_, Value::Null) => self.empty_value(),
            (Self::Date, Value::String(text)) => parse_datetime(text)
                .map_or_else(|| FieldValue::Text(text.clone()), FieldValue::from),
            (_, Value::String(text)) => FieldValue::Text(text.clone()),
            (_, Value::Bool(flag)) => FieldValue::Bool(*flag),
            (_, Value::Number(number)) => FieldValue::Text(number.to_string()),
            (_, Value::Array(items)) => FieldValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            (_, Value::Object(_)) => FieldValue::Text(raw.to_string()),
        }
    }
}

/// Validation rules for one field.
#[derive(Clone)]
pub struct FieldSchema {
    /// Field name.
    pub name: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Expected kind of value.
    pub kind: FieldKind,
    /// Whether an empty value is an error.
    pub required: bool,
    /// Message for an empty required field.
    pub required_message: String,
    /// Message for a failed kind check.
    pub kind_message: String,
    /// Additional validators, run in order.
    pub validators: Vec<Arc<dyn Validator>>,
}

impl std::fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("required_message", &self.required_message)
            .field("kind_message", &self.kind_message)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl FieldSchema {
    /// Creates a new optional field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            required: false,
            required_message: DEFAULT_REQUIRED_MESSAGE.to_string(),
            kind_message: kind.default_message().to_string(),
            validators: Vec::new(),
        }
    }

    /// Creates a text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Creates an email field.
    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Email)
    }

    /// Creates a field that must be checked.
    pub fn boolean_true(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::BooleanTrue)
    }

    /// Creates a date-time field.
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// Creates a multiple-choice field.
    pub fn choices(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Choices)
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the label, falling back to the field name.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Makes the field required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Makes the field required with a custom message.
    #[must_use]
    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.required_message = message.into();
        self
    }

    /// Sets the message used when the kind check fails.
    #[must_use]
    pub fn kind_message(mut self, message: impl Into<String>) -> Self {
        self.kind_message = message.into();
        self
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Adds a closure returning an error message or `None`.
    #[must_use]
    pub fn check(
        self,
        predicate: impl Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.validator(PredicateValidator::new(predicate))
    }

    /// Validates a value against this field's rules.
    ///
    /// Checks run in order and stop at the first failure: required check,
    /// kind check, then validators. An empty value on an optional field is
    /// valid and skips every later check.
    pub fn validate(&self, value: &FieldValue) -> Option<String> {
        if value.is_empty() {
            return self.required.then(|| self.required_message.clone());
        }

        if !self.kind.accepts(value) {
            return Some(self.kind_message.clone());
        }

        self.validators
            .iter()
            .find_map(|validator| validator.validate(value).err())
    }
}

/// An ordered set of field schemas with unique names.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<FieldSchema>,
    index: HashMap<String, usize>,
}

impl FormSchema {
    /// Creates a new schema builder.
    pub fn builder() -> FormSchemaBuilder {
        FormSchemaBuilder::new()
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Returns the field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Returns the schema of a field.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Returns whether a field is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn require(&self, name: &str) -> Result<&FieldSchema> {
        self.field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Validates one value against the named field.
    pub fn validate_field(&self, name: &str, value: &FieldValue) -> Result<Option<String>> {
        Ok(self.require(name)?.validate(value))
    }

    /// Validates every declared field.
    ///
    /// A declared field missing from `values` is validated as its kind's
    /// blank value. Values for undeclared fields are ignored.
    pub fn validate_all(&self, values: &FormValues) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in &self.fields {
            let error = match values.get(&field.name) {
                Some(value) => field.validate(value),
                None => field.validate(&field.kind.empty_value()),
            };
            errors.set(&field.name, error);
        }
        errors
    }

    /// Returns every field set to its kind's blank value.
    pub fn default_values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.kind.empty_value()))
            .collect()
    }
}

/// Builder for [`FormSchema`].
#[derive(Debug, Default)]
pub struct FormSchemaBuilder {
    fields: Vec<FieldSchema>,
}

impl FormSchemaBuilder {
    /// Creates a new schema builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field to the schema.
    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Builds the schema, rejecting duplicate field names.
    pub fn build(self) -> Result<FormSchema> {
        let mut index = HashMap::with_capacity(self.fields.len());
        for (i, field) in self.fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(FormError::DuplicateField(field.name.clone()));
            }
        }
        Ok(FormSchema {
            fields: self.fields,
            index,
        })
    }
}
