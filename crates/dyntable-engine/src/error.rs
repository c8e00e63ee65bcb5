//! Error taxonomy of the table engine.
//!
//! Three kinds cover every failure path: client faults for bad payloads and
//! missing targets, and one server-fault bucket for backend trouble.
//! Validation happens before any backend call, so a Validation error implies
//! zero side effects.

use dyntable_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Required payload element missing or malformed. Never retried.
    #[error("{0}")]
    Validation(String),

    /// No item or table matches the key or prefix. Never retried.
    #[error("{0}")]
    NotFound(String),

    /// The backend call failed for any other reason.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Whether the failure is the caller's fault (safe to show the message
    /// verbatim) as opposed to a backend fault.
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_classification() {
        assert!(EngineError::validation("Record is required").is_client_fault());
        assert!(EngineError::not_found("Table not found").is_client_fault());
        assert!(!EngineError::Store(StoreError::Backend("boom".into())).is_client_fault());
    }

    #[test]
    fn test_store_error_converts() {
        fn fails() -> Result<()> {
            Err(StoreError::BatchTooLarge(30))?;
            Ok(())
        }
        assert!(matches!(fails().unwrap_err(), EngineError::Store(_)));
    }
}
