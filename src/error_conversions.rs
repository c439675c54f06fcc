//! Error conversion glue between the domain, gateway, form and service layers.
//!
//! The domain layer must not depend on service error types, so the `From`
//! impls live here instead of next to the types they convert.

use log::error;

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::gateway::errors::ApiError;
use crate::list::actions::DispatchError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<ApiError> for ServiceError {
    fn from(val: ApiError) -> Self {
        match val {
            ApiError::NotFound => ServiceError::NotFound,
            other => ServiceError::Api(other),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Form {
            message: val.to_string(),
            fields: val.field_errors(),
        }
    }
}

impl From<DispatchError> for ServiceError {
    fn from(val: DispatchError) -> Self {
        error!("Rejected dialog submission: {val}");
        ServiceError::Internal
    }
}
