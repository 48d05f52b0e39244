//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("policy '{kind}' failed for item '{item}': {reason}")]
    PolicyFailed {
        kind: &'static str,
        item: String,
        reason: String,
    },

    #[error("invalid policy configuration: {message}")]
    InvalidPolicy { message: String },
}

/// Result type for domain layer operations.
pub type DomainResult<T> = Result<T, DomainError>;
