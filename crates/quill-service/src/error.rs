use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] quill_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] quill_core::error::CoreError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),
}

impl ServiceError {
    /// Returns `true` if the error was raised by a unique index.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::DieselError(e) => quill_db::error::is_unique_violation(e),
            Self::DatabaseError(e) => e.is_unique_violation(),
            _ => false,
        }
    }

    /// ## Summary
    /// Turns a unique violation into `Conflict(message)` and leaves every
    /// other error untouched.
    #[must_use]
    pub fn into_conflict(self, message: &str) -> Self {
        if self.is_unique_violation() {
            Self::Conflict(message.to_string())
        } else {
            self
        }
    }

    /// Returns `true` when the error was caused by data supplied by the client.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        match self {
            Self::CoreError(e) => e.is_client_error(),
            Self::ValidationError(_) => true,
            _ => false,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    use super::*;

    fn unique_violation() -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        )
    }

    #[test]
    fn test_unique_violation_becomes_conflict() {
        let err = ServiceError::from(unique_violation()).into_conflict("slug taken");
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "slug taken"));

        let wrapped = ServiceError::from(quill_db::error::DbError::from(unique_violation()))
            .into_conflict("slug taken");
        assert!(matches!(wrapped, ServiceError::Conflict(_)));
    }

    #[test]
    fn test_other_errors_are_kept() {
        let err = ServiceError::from(DieselError::NotFound).into_conflict("slug taken");
        assert!(matches!(err, ServiceError::DieselError(DieselError::NotFound)));

        let err = ServiceError::NotFound("Case study not found".to_string()).into_conflict("x");
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_client_errors() {
        let err = ServiceError::from(quill_core::error::CoreError::InvalidInput(
            "title is required".to_string(),
        ));
        assert!(err.is_client_error());
        assert!(ServiceError::ValidationError("x".to_string()).is_client_error());
        assert!(!ServiceError::Conflict("x".to_string()).is_client_error());
    }
}
