use std::collections::BTreeMap;

use thiserror::Error;

/// Failures reported by the LMS backend or while talking to it.
///
/// The type is `Clone` so one failed fetch can be handed to every caller that
/// joined it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("{0}")]
    Business(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Short message suitable for a notification or an inline error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "The LMS could not be reached. Please try again.".to_string(),
            ApiError::Status { status, .. } if *status >= 500 => {
                "The LMS failed to process the request.".to_string()
            }
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Business(message) => message.clone(),
            ApiError::NotFound => "The requested record no longer exists.".to_string(),
            ApiError::Decode(_) => "The LMS returned an unexpected response.".to_string(),
        }
    }

    /// Field-level messages, empty unless the backend rejected specific fields.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            ApiError::Validation { fields, .. } => fields.clone(),
            _ => BTreeMap::new(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_hide_backend_details() {
        let err = ApiError::Status {
            status: 502,
            message: "upstream php fatal".to_string(),
        };
        assert_eq!(err.user_message(), "The LMS failed to process the request.");
    }

    #[test]
    fn business_errors_surface_verbatim() {
        let err = ApiError::Business("Email already registered".to_string());
        assert_eq!(err.user_message(), "Email already registered");
        assert!(err.field_errors().is_empty());
    }
}
