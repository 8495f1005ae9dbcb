//! Domain error taxonomy shared by all Courier services.

use thiserror::Error;

/// Errors raised by the domain services.
///
/// Every failure a service can report falls into one of these kinds;
/// the API layer maps each kind to an HTTP status.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requested entity, credential match, or claim set is absent.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A create was attempted against an identity already present.
    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    /// Input failed a validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The commit step failed; carries the underlying message, not retried.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Token signing or verification failed.
    #[error("Token error: {0}")]
    Token(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DomainError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => DomainError::NotFound("row"),
            // A racing duplicate insert hits the unique index instead of
            // bypassing the existence check.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::AlreadyExists("row")
            }
            _ => DomainError::Persistence(e.to_string()),
        }
    }
}

/// Convenience alias for domain-level results.
pub type DomainResult<T> = Result<T, DomainError>;
