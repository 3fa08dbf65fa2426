#![allow(dead_code)]

use veriform_core::{FieldSchema, FieldValue, FormSchema, FormState, FormValues};

/// The two-field form used in the submit walkthrough.
pub fn text_email_schema() -> FormSchema {
    FormSchema::builder()
        .field(FieldSchema::text("text").required_message("Text field is required"))
        .field(
            FieldSchema::email("email")
                .required_message("Email is required")
                .kind_message("Enter a valid email"),
        )
        .build()
        .unwrap_or_else(|e| panic!("Failed to build schema: {e}"))
}

/// The full tutorial form: text, select, checkbox, radio, datetime, email
/// and an unvalidated multi-select.
pub fn tutorial_schema() -> FormSchema {
    FormSchema::builder()
        .field(FieldSchema::text("text").required_message("Text field is required"))
        .field(FieldSchema::text("select").required_message("Please select an option"))
        .field(FieldSchema::boolean_true("checkbox").kind_message("Please accept the terms"))
        .field(FieldSchema::text("radio").required_message("Please select an option"))
        .field(FieldSchema::date("datetime").required_message("Date and time are required"))
        .field(
            FieldSchema::email("email")
                .required_message("Email is required")
                .kind_message("Enter a valid email"),
        )
        .field(FieldSchema::choices("multiSelect"))
        .build()
        .unwrap_or_else(|e| panic!("Failed to build schema: {e}"))
}

pub fn values<const N: usize>(entries: [(&str, FieldValue); N]) -> FormValues {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

pub fn fresh(schema: &FormSchema) -> FormState {
    FormState::initialize(schema, schema.default_values())
        .unwrap_or_else(|e| panic!("Failed to initialize: {e}"))
}

pub fn set(
    state: FormState,
    schema: &FormSchema,
    name: &str,
    value: impl Into<FieldValue>,
) -> FormState {
    state
        .set_value(schema, name, value)
        .unwrap_or_else(|e| panic!("Failed to set {name}: {e}"))
}

/// Submits and returns the new state together with every callback payload.
pub fn submit(state: FormState, schema: &FormSchema) -> (FormState, Vec<FormValues>) {
    let mut calls = Vec::new();
    let state = state.submit(schema, |values| calls.push(values.clone()));
    (state, calls)
}
