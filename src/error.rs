//! Error types for stylestore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using StyleError
pub type Result<T> = std::result::Result<T, StyleError>;

/// Unified error type for stylestore operations
#[derive(Debug, Error)]
pub enum StyleError {
    // -------------------------------------------------------------------------
    // Validation Errors (surfaced to the caller)
    // -------------------------------------------------------------------------
    /// A required name, record or collection argument was empty or absent
    #[error("The \"{0}\" argument is required.")]
    ArgumentMissing(&'static str),

    /// A record (or one element of a bulk import) lacks a usable name
    #[error("{0}")]
    InvalidRecord(String),

    /// Rename source does not exist
    #[error("The style named \"{0}\" was not found.")]
    NotFound(String),

    /// Rename target already exists
    #[error("A style named \"{0}\" already exists.")]
    Conflict(String),

    // -------------------------------------------------------------------------
    // I/O Errors (logged and absorbed by the engine)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StyleError {
    /// Whether this error is the caller's fault (maps to a 4xx response)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StyleError::ArgumentMissing(_)
                | StyleError::InvalidRecord(_)
                | StyleError::NotFound(_)
                | StyleError::Conflict(_)
        )
    }
}

impl From<serde_json::Error> for StyleError {
    fn from(e: serde_json::Error) -> Self {
        StyleError::Serialization(e.to_string())
    }
}
