//! Error conversion glue between the form, domain and service layers.
//!
//! The domain layer must not depend on service error types, so the
//! conversions live here and are only compiled with the `server` feature.

use crate::domain::types::TypeConstraintError;
use crate::forms::products::ProductFormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(val: ProductFormError) -> Self {
        match val {
            ProductFormError::ImageRead => ServiceError::Internal,
            other => ServiceError::Validation(other.to_string()),
        }
    }
}
