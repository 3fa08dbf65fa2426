//! Field values.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Current values of a form, keyed by field name.
pub type FormValues = BTreeMap<String, FieldValue>;

/// Formats accepted for date-time strings besides RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// The value held by a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text, email, select and radio inputs.
    Text(String),
    /// Checkboxes.
    Bool(bool),
    /// Date-time pickers; `None` until a date is picked.
    Date(Option<NaiveDateTime>),
    /// Multi-selects.
    List(Vec<String>),
}

impl FieldValue {
    /// Returns whether the value counts as "not filled in".
    ///
    /// A boolean is never empty: an unchecked box is a value.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Bool(_) => false,
            Self::Date(date) => date.is_none(),
            Self::List(items) => items.is_empty(),
        }
    }

    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the flag, if this is a boolean value.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the date, if this is a date value or text that parses as one.
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(date) => *date,
            Self::Text(text) => parse_datetime(text),
            _ => None,
        }
    }

    /// Returns the items, if this is a list value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts the value to plain JSON.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(text) => serde_json::Value::String(text.clone()),
            Self::Bool(flag) => serde_json::Value::Bool(*flag),
            Self::Date(Some(date)) => {
                serde_json::Value::String(date.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            Self::Date(None) => serde_json::Value::Null,
            Self::List(items) => serde_json::Value::Array(
                items
                    .iter()
                    .cloned()
                    .map(serde_json::Value::String)
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(Some(value))
    }
}

impl From<Option<NaiveDateTime>> for FieldValue {
    fn from(value: Option<NaiveDateTime>) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Parses a date-time string as entered by a user or sent by a host.
///
/// Accepts RFC 3339 (converted to UTC), ISO-like `YYYY-MM-DD[T ]HH:MM[:SS]`
/// and a bare `YYYY-MM-DD`, which is taken as midnight.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(date) = NaiveDateTime::parse_from_str(input, format) {
            return Some(date);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_is_empty() {
        assert!(FieldValue::from("").is_empty());
        assert!(!FieldValue::from(" ").is_empty());
        assert!(!FieldValue::from(false).is_empty());
        assert!(FieldValue::Date(None).is_empty());
        assert!(FieldValue::List(Vec::new()).is_empty());
        assert!(!FieldValue::from(vec!["option1"]).is_empty());
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = datetime(2024, 1, 15, 10, 30);
        assert_eq!(parse_datetime("2024-01-15T10:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-15T10:30"), Some(expected));
        assert_eq!(parse_datetime("2024-01-15 10:30"), Some(expected));
        assert_eq!(parse_datetime("2024-01-15T12:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_datetime("2024-01-15"),
            Some(datetime(2024, 1, 15, 0, 0))
        );
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("tomorrow"), None);
        assert_eq!(parse_datetime("2024-13-01"), None);
    }

    #[test]
    fn test_as_date_parses_text() {
        let value = FieldValue::from("2024-01-15T10:30");
        assert_eq!(value.as_date(), Some(datetime(2024, 1, 15, 10, 30)));
        assert_eq!(FieldValue::from(true).as_date(), None);
    }

    #[test]
    fn test_untagged_json() {
        let values: FormValues = serde_json::from_str(
            r#"{"text": "hello", "checkbox": true, "datetime": null, "tags": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(values["text"], FieldValue::from("hello"));
        assert_eq!(values["checkbox"], FieldValue::Bool(true));
        assert_eq!(values["datetime"], FieldValue::Date(None));
        assert_eq!(values["tags"], FieldValue::from(vec!["a", "b"]));
    }

    #[test]
    fn test_to_json() {
        let value = FieldValue::from(datetime(2024, 1, 15, 10, 30));
        assert_eq!(value.to_json(), serde_json::json!("2024-01-15T10:30:00"));
        assert_eq!(FieldValue::Date(None).to_json(), serde_json::Value::Null);
    }
}
