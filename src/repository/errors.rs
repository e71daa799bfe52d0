use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors produced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No connection could be checked out of the pool.
    #[error("connection error: {0}")]
    ConnectionError(#[from] diesel::r2d2::PoolError),
    /// The database rejected or failed a query.
    #[error("database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
    /// A stored row could not be mapped onto domain types.
    #[error("validation error: {0}")]
    ValidationError(String),
    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
