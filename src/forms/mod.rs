//! Form definitions backing the console routes.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod courses;
#[cfg(feature = "server")]
pub mod import;
pub mod list;
pub mod pricing_rules;
pub mod teams;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid id")]
    InvalidId,

    #[error("invalid role")]
    InvalidRole,

    #[error("invalid status")]
    InvalidStatus,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("invalid percentage")]
    InvalidPercentage,

    #[error("invalid date")]
    InvalidDate,

    #[error("end date precedes start date")]
    InvalidDateRange,

    #[error("invalid csv file: {0}")]
    Csv(String),

    #[error("{0}")]
    TypeConstraint(#[from] TypeConstraintError),

    #[error("failed to encode payload: {0}")]
    Encode(String),
}

impl FormError {
    /// Messages keyed by form field, for inline display next to the inputs.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            FormError::Validation(errors) => errors
                .field_errors()
                .into_iter()
                .filter_map(|(field, errors)| {
                    let error = errors.first()?;
                    let message = error
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| error.code.to_string());
                    Some((field.to_string(), message))
                })
                .collect(),
            FormError::InvalidEmail => single("email", self),
            FormError::InvalidName => single("name", self),
            FormError::InvalidRole => single("role", self),
            FormError::InvalidStatus => single("status", self),
            FormError::InvalidAmount => single("price", self),
            FormError::InvalidPercentage => single("discount_percent", self),
            FormError::InvalidDate | FormError::InvalidDateRange => single("ends_on", self),
            _ => BTreeMap::new(),
        }
    }
}

fn single(field: &str, error: &FormError) -> BTreeMap<String, String> {
    BTreeMap::from([(field.to_string(), error.to_string())])
}

impl From<csv::Error> for FormError {
    fn from(err: csv::Error) -> Self {
        FormError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::Encode(err.to_string())
    }
}

/// Parses an optional HTML input: blank means `None`.
pub(crate) fn parse_optional<T: FromStr>(value: &str, error: FormError) -> Result<Option<T>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| error)
}

/// Blank inputs become `None`, everything else is trimmed.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
