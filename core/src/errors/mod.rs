//! Domain-specific error types and error handling.

use thiserror::Error;

/// Core domain errors
///
/// `InvalidOrExpired` covers "no such record", "wrong code"
/// and "expired" alike so callers cannot tell which case applied.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Delivery failure: {message}")]
    DeliveryFailure { message: String },

    #[error("Invalid or expired code")]
    InvalidOrExpired,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Whether the caller can fix the failure by changing its request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::Validation { .. } | DomainError::InvalidOrExpired
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
