//! Field validators.
//!
//! Validators run after a field's required check and kind check, in the
//! order they were attached. The first one to fail supplies the field's
//! error.

use std::sync::LazyLock;

use regex::Regex;

use crate::value::FieldValue;

// Same acceptance as the WHATWG `type=email` check: dotless hosts are allowed.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+",
        r"@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
        r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    ))
    .expect("email regex compiles")
});

/// Returns whether `value` looks like an email address.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: &FieldValue) -> Result<(), String>;
}

/// Length of a value as seen by the length validators: characters for
/// text, items for lists.
fn measured_len(value: &FieldValue) -> Option<usize> {
    match value {
        FieldValue::Text(text) => Some(text.chars().count()),
        FieldValue::List(items) => Some(items.len()),
        _ => None,
    }
}

/// Validator that enforces a maximum length.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    max_length: usize,
    message: String,
}

impl MaxLengthValidator {
    /// Creates a new MaxLengthValidator.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            message: format!("Ensure this value has at most {max_length} characters."),
        }
    }

    /// Creates a new MaxLengthValidator with custom message.
    pub fn with_message(max_length: usize, message: impl Into<String>) -> Self {
        Self {
            max_length,
            message: message.into(),
        }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match measured_len(value) {
            Some(len) if len > self.max_length => Err(self.message.clone()),
            _ => Ok(()),
        }
    }
}

/// Validator that enforces a minimum length.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    min_length: usize,
    message: String,
}

impl MinLengthValidator {
    /// Creates a new MinLengthValidator.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            message: format!("Ensure this value has at least {min_length} characters."),
        }
    }

    /// Creates a new MinLengthValidator with custom message.
    pub fn with_message(min_length: usize, message: impl Into<String>) -> Self {
        Self {
            min_length,
            message: message.into(),
        }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match measured_len(value) {
            Some(len) if len < self.min_length => Err(self.message.clone()),
            _ => Ok(()),
        }
    }
}

/// Validator using a custom regex pattern. Only text values are checked.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: Regex,
    message: String,
}

impl RegexValidator {
    /// Creates a new RegexValidator.
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: message.into(),
        })
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match value.as_text() {
            Some(text) if !self.pattern.is_match(text) => Err(self.message.clone()),
            _ => Ok(()),
        }
    }
}

/// Validator that only accepts values from a fixed set.
#[derive(Debug, Clone)]
pub struct OneOfValidator {
    allowed: Vec<FieldValue>,
    message: String,
}

impl OneOfValidator {
    /// Creates a new OneOfValidator with default message.
    pub fn new(allowed: Vec<FieldValue>) -> Self {
        Self {
            allowed,
            message: "Select a valid choice.".to_string(),
        }
    }

    /// Creates a new OneOfValidator with custom message.
    pub fn with_message(allowed: Vec<FieldValue>, message: impl Into<String>) -> Self {
        Self {
            allowed,
            message: message.into(),
        }
    }
}

impl Validator for OneOfValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        if self.allowed.contains(value) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }
}

type Predicate = Box<dyn Fn(&FieldValue) -> Option<String> + Send + Sync>;

/// Validator backed by a closure returning an error message or `None`.
pub struct PredicateValidator {
    predicate: Predicate,
}

impl PredicateValidator {
    /// Creates a new PredicateValidator.
    pub fn new(predicate: impl Fn(&FieldValue) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl std::fmt::Debug for PredicateValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateValidator").finish_non_exhaustive()
    }
}

impl Validator for PredicateValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        (self.predicate)(value).map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("user.name@domain.co.uk"));
        assert!(!is_valid_email("abc"));
        assert!(!is_valid_email("@example.com"));
        assert!(is_valid_email("user@localhost"));
        assert!(is_valid_email("o'brien@example.com"));
        assert!(is_valid_email("a!b@example.com"));
        assert!(is_valid_email("x@sub.example.museum1"));
        assert!(!is_valid_email("user@-example.com"));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn test_max_length_validator() {
        let v = MaxLengthValidator::new(5);
        assert!(v.validate(&"hello".into()).is_ok());
        assert!(v.validate(&"hi".into()).is_ok());
        assert!(v.validate(&"hello world".into()).is_err());
    }

    #[test]
    fn test_min_length_counts_list_items() {
        let v = MinLengthValidator::with_message(2, "Pick at least two");
        assert!(v.validate(&vec!["a", "b"].into()).is_ok());
        assert_eq!(
            v.validate(&vec!["a"].into()),
            Err("Pick at least two".to_string())
        );
        assert!(v.validate(&true.into()).is_ok());
    }

    #[test]
    fn test_min_length_counts_characters() {
        let v = MinLengthValidator::new(3);
        assert!(v.validate(&"äöü".into()).is_ok());
        assert!(v.validate(&"äö".into()).is_err());
    }

    #[test]
    fn test_regex_validator() {
        let v = RegexValidator::new(r"^option\d$", "Pick an option").unwrap();
        assert!(v.validate(&"option1".into()).is_ok());
        assert!(v.validate(&"other".into()).is_err());
        assert!(v.validate(&false.into()).is_ok());
    }

    #[test]
    fn test_one_of_validator() {
        let v = OneOfValidator::with_message(vec![true.into()], "Please accept the terms");
        assert!(v.validate(&true.into()).is_ok());
        assert_eq!(
            v.validate(&false.into()),
            Err("Please accept the terms".to_string())
        );
    }

    #[test]
    fn test_predicate_validator() {
        let v = PredicateValidator::new(|value| {
            (value.as_text() == Some("admin")).then(|| "Name is reserved".to_string())
        });
        assert!(v.validate(&"alice".into()).is_ok());
        assert_eq!(
            v.validate(&"admin".into()),
            Err("Name is reserved".to_string())
        );
    }
}
