//! Form definitions shared by the dashboard forms and the JSON API bodies.
//!
//! HTML forms submit every value as a string and leave optional inputs
//! blank, while JSON bodies send numbers, booleans and `null`. The
//! deserializers in this module accept both shapes.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de::Error as _};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod campaign;
pub mod campaign_type;
pub mod inquiry;
pub mod role;
pub mod task;
pub mod user;

/// Errors that can occur when processing form data.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: TypeConstraintError,
    },
}

impl FormError {
    /// Field name to error codes, as reported in API error bodies.
    pub fn details(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            FormError::Validation(errors) => errors
                .field_errors()
                .into_iter()
                .map(|(field, errors)| {
                    let codes = errors.iter().map(|e| e.code.to_string()).collect();
                    (field.to_string(), codes)
                })
                .collect(),
            FormError::InvalidField { field, reason } => {
                BTreeMap::from([(field.to_string(), vec![reason.to_string()])])
            }
        }
    }
}

/// Attaches a field name to a value-object construction failure.
pub(crate) trait FieldResult<T> {
    fn field(self, name: &'static str) -> Result<T, FormError>;
}

impl<T> FieldResult<T> for Result<T, TypeConstraintError> {
    fn field(self, name: &'static str) -> Result<T, FormError> {
        self.map_err(|reason| FormError::InvalidField {
            field: name,
            reason,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

fn loose<'de, D>(deserializer: D) -> Result<Option<Loose>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.filter(|v| !matches!(v, Loose::Text(s) if s.trim().is_empty())))
}

/// Optional free text; blank strings become `None`.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

pub(crate) fn optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::Int(value)) => Ok(Some(value)),
        Some(Loose::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid integer: {text}"))),
        Some(_) => Err(D::Error::custom("expected an integer")),
    }
}

/// Optional identifier; `0` and blanks both mean "none selected".
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = optional_i64(deserializer)?;
    match value {
        None | Some(0) => Ok(None),
        Some(value) => i32::try_from(value)
            .map(Some)
            .map_err(|_| D::Error::custom("identifier out of range")),
    }
}

pub(crate) fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::Int(value)) => Ok(Some(value as f64)),
        Some(Loose::Float(value)) => Ok(Some(value)),
        Some(Loose::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid number: {text}"))),
        Some(Loose::Bool(_)) => Err(D::Error::custom("expected a number")),
    }
}

pub(crate) fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer)?
        .map(|text| {
            NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map_err(|_| D::Error::custom(format!("invalid date: {text}")))
        })
        .transpose()
}

/// Accepts `datetime-local` input values as well as full timestamps.
pub(crate) fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

    let text = text.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

pub(crate) fn optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_text(deserializer)?
        .map(|text| {
            parse_datetime(&text).ok_or_else(|| D::Error::custom(format!("invalid datetime: {text}")))
        })
        .transpose()
}

pub(crate) fn datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    optional_datetime(deserializer)?.ok_or_else(|| D::Error::custom("datetime is required"))
}

/// Checkbox or select value: `on`, `true`, `1` and JSON `true` are set.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match loose(deserializer)? {
        None => false,
        Some(Loose::Bool(value)) => value,
        Some(Loose::Int(value)) => value != 0,
        Some(Loose::Float(value)) => value != 0.0,
        Some(Loose::Text(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "on" | "true" | "1" | "yes"
        ),
    })
}

/// Tri-state filter: blank means "any", otherwise `true`/`false`.
pub(crate) fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::Bool(value)) => Ok(Some(value)),
        Some(Loose::Int(value)) => Ok(Some(value != 0)),
        Some(Loose::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Ok(Some(true)),
            "false" | "0" | "off" | "no" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("invalid flag: {text}"))),
        },
        Some(Loose::Float(_)) => Err(D::Error::custom("expected a flag")),
    }
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "optional_id")]
        id: Option<i32>,
        #[serde(default, deserialize_with = "optional_f64")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "flag")]
        active: bool,
        #[serde(default, deserialize_with = "optional_datetime")]
        due: Option<NaiveDateTime>,
    }

    #[test]
    fn html_form_values_are_parsed() {
        let sample: Sample =
            serde_html_form::from_str("id=&amount=12.5&active=on&due=2025-06-01T09%3A30").unwrap();

        assert_eq!(sample.id, None);
        assert_eq!(sample.amount, Some(12.5));
        assert!(sample.active);
        assert_eq!(
            sample.due.map(|d| d.to_string()),
            Some("2025-06-01 09:30:00".to_string())
        );
    }

    #[test]
    fn json_values_are_parsed() {
        let sample: Sample =
            serde_json::from_str(r#"{"id": 4, "amount": 3, "active": false, "due": null}"#)
                .unwrap();

        assert_eq!(sample.id, Some(4));
        assert_eq!(sample.amount, Some(3.0));
        assert!(!sample.active);
        assert!(sample.due.is_none());
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(serde_json::from_str::<Sample>(r#"{"amount": "lots"}"#).is_err());
    }

    #[test]
    fn field_errors_are_reported_by_name() {
        let err = Err::<(), _>(TypeConstraintError::InvalidEmail)
            .field("email")
            .unwrap_err();

        let details = err.details();
        assert_eq!(details["email"], vec!["invalid email address".to_string()]);
    }
}
