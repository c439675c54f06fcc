//! Use cases behind the console routes.
//!
//! Services talk to the backend only through [`crate::gateway::EntityGateway`]
//! and read lists only through the shared [`crate::query::QueryCache`].

use std::collections::BTreeMap;

use thiserror::Error;

use crate::gateway::errors::ApiError;

pub mod dashboard;
#[cfg(feature = "server")]
pub mod import;
pub mod list;
pub mod mutations;
pub mod reports;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    /// Input was rejected before anything was sent to the backend.
    #[error("form error: {message}")]
    Form {
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error(transparent)]
    Api(ApiError),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("internal error")]
    Internal,
}

impl ServiceError {
    /// Message to show the user, inline or as a notification.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::NotFound => ApiError::NotFound.user_message(),
            ServiceError::Form { .. } => "Please correct the highlighted fields.".to_string(),
            ServiceError::Api(err) => err.user_message(),
            ServiceError::TypeConstraint(message) => message.clone(),
            ServiceError::Internal => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Field-level messages from local validation or the backend.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            ServiceError::Form { fields, .. } => fields.clone(),
            ServiceError::Api(err) => err.field_errors(),
            _ => BTreeMap::new(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
