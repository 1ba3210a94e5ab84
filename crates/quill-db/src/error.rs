use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DieselError),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    #[error(transparent)]
    CoreError(#[from] quill_core::error::CoreError),
}

impl DbError {
    /// Returns `true` if the error is a unique constraint violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::DatabaseError(e) if is_unique_violation(e))
    }
}

/// ## Summary
/// Returns `true` if a diesel error was raised by a unique index, e.g. a lost
/// race on the partial `slug` index.
#[must_use]
pub fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

pub type DbResult<T> = std::result::Result<T, DbError>;
