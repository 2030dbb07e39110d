use thiserror::Error;

use crate::repository::RepositoryError;

/// Result alias returned by the service layer.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced to route handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("lookup matched more than one record")]
    Ambiguous,
    #[error("{0}")]
    Form(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            RepositoryError::AmbiguousResult => ServiceError::Ambiguous,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
