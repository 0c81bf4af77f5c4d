use thiserror::Error;

use super::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Record not found")]
    NotFound,
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("Status cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    /// Whether the same operation may succeed if the caller tries again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Persistence(_))
    }
}
