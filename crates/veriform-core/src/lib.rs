//! # veriform-core
//!
//! Validated form state: declarative field schemas, touched tracking and
//! submit handling for UI hosts.
//!
//! This crate provides:
//! - Field values and field kinds (text, email, must-be-true, date, choices)
//! - Schemas built with a builder or loaded from a JSON definition
//! - Validators (length, regex, one-of, closures)
//! - A form state controller that keeps errors consistent with values
//!
//! ## Quick Start
//!
//! ```rust
//! use veriform_core::{FieldSchema, FormSchema, FormState};
//!
//! let schema = FormSchema::builder()
//!     .field(FieldSchema::text("text").required_message("Text field is required"))
//!     .field(
//!         FieldSchema::email("email")
//!             .required_message("Email is required")
//!             .kind_message("Enter a valid email"),
//!     )
//!     .build()?;
//!
//! let state = FormState::initialize(&schema, schema.default_values())?;
//! assert_eq!(state.error("email"), Some("Email is required"));
//!
//! // Errors are only shown once a field has been left.
//! assert_eq!(state.visible_error("email"), None);
//!
//! let state = state
//!     .set_value(&schema, "text", "hello")?
//!     .set_value(&schema, "email", "x@y.com")?
//!     .set_touched(&schema, "email")?;
//!
//! let mut submitted = None;
//! let state = state.submit(&schema, |values| submitted = Some(values.clone()));
//! assert!(state.is_valid());
//! assert_eq!(submitted.as_ref(), Some(state.values()));
//! # Ok::<(), veriform_core::FormError>(())
//! ```
//!
//! ## Validation
//!
//! Each field is checked in a fixed order and the first failure wins:
//! the required check, then the kind check, then any attached validators.
//!
//! ```rust
//! use veriform_core::{FieldSchema, FormSchema};
//! use veriform_core::validation::MinLengthValidator;
//!
//! let schema = FormSchema::builder()
//!     .field(
//!         FieldSchema::text("username")
//!             .required()
//!             .validator(MinLengthValidator::new(3))
//!             .check(|value| {
//!                 (value.as_text() == Some("admin"))
//!                     .then(|| "This name is reserved".to_string())
//!             }),
//!     )
//!     .build()?;
//!
//! assert_eq!(
//!     schema.validate_field("username", &"".into())?.as_deref(),
//!     Some("field is required")
//! );
//! assert_eq!(
//!     schema.validate_field("username", &"admin".into())?.as_deref(),
//!     Some("This name is reserved")
//! );
//! # Ok::<(), veriform_core::FormError>(())
//! ```
//!
//! ## Definitions
//!
//! ```rust
//! use veriform_core::{FormDefinition, FormState};
//!
//! let definition = FormDefinition::from_json(r#"{
//!     "fields": [
//!         {"name": "checkbox", "kind": "boolean-true",
//!          "kind_message": "Please accept the terms"}
//!     ]
//! }"#)?;
//! let schema = definition.to_schema()?;
//! let state = FormState::initialize(&schema, definition.initial_values())?;
//! assert_eq!(state.error("checkbox"), Some("Please accept the terms"));
//! # Ok::<(), veriform_core::FormError>(())
//! ```

pub mod definition;
mod error;
pub mod schema;
mod state;
pub mod validation;
pub mod value;

pub use definition::{FieldDefinition, FormDefinition};
pub use error::{FormError, Result, ValidationErrors};
pub use schema::{FieldKind, FieldSchema, FormSchema, FormSchemaBuilder};
pub use state::FormState;
pub use value::{FieldValue, FormValues};
