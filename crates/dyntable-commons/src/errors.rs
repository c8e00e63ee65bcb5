//! Shared error types for dyntable.

use thiserror::Error;

/// Common error type for validation of shared models and identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// Invalid input provided to a constructor or helper.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CommonError {
    /// Creates an InvalidInput error with a message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using CommonError.
pub type Result<T> = std::result::Result<T, CommonError>;
