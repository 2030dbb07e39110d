use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Result alias returned by every repository operation.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No row matched the lookup.
    #[error("record not found")]
    NotFound,
    /// A uniqueness or referential constraint rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// A lookup that must match a single row matched several.
    #[error("lookup matched more than one record")]
    AmbiguousResult,
    /// Stored data breaks an invariant, e.g. a category parent cycle.
    #[error("inconsistent data: {0}")]
    Inconsistent(String),
    #[error("database error: {0}")]
    Database(DieselError),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(
                kind @ (DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation),
                info,
            ) => {
                let reason = match kind {
                    DatabaseErrorKind::ForeignKeyViolation => "referenced record does not exist",
                    DatabaseErrorKind::CheckViolation => "value out of range",
                    _ => "duplicate value",
                };
                RepositoryError::ConstraintViolation(format!("{reason}: {}", info.message()))
            }
            other => RepositoryError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        let err = RepositoryError::from(DieselError::NotFound);

        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn unique_violation_maps_to_constraint_violation() {
        let err = RepositoryError::from(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed: categories.slug".to_string()),
        ));

        match err {
            RepositoryError::ConstraintViolation(message) => {
                assert!(message.contains("categories.slug"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn check_violation_maps_to_constraint_violation() {
        let err = RepositoryError::from(DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new("CHECK constraint failed: price_cents".to_string()),
        ));

        assert!(matches!(err, RepositoryError::ConstraintViolation(message) if message.contains("price_cents")));
    }

    #[test]
    fn other_database_errors_are_kept() {
        let err = RepositoryError::from(DieselError::RollbackTransaction);

        assert!(matches!(err, RepositoryError::Database(_)));
    }
}
