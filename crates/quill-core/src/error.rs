use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Title '{0}' does not contain any characters usable in a URL")]
    EmptySlug(String),

    #[error("No free slug for '{base}' after {attempts} numbered candidates")]
    SlugExhausted { base: String, attempts: u32 },

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

impl CoreError {
    /// Returns `true` when the error was caused by data supplied by the client.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidInput(_) | Self::EmptySlug(_)
        )
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
