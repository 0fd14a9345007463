//! Error types for Inkrypt core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for Inkrypt operations.
pub type Result<T> = std::result::Result<T, InkryptError>;

/// Core error type for Inkrypt operations.
#[derive(Debug, Error)]
pub enum InkryptError {
    /// Rejected before any crypto or I/O ran (blank PIN, blank export password, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ciphertext failed tag verification, or the blob is malformed.
    ///
    /// Never carries plaintext, partial or otherwise.
    #[error("Authentication failed")]
    AuthenticationFailure,

    /// Encryption error that is not an authentication failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Journal store file not found
    #[error("Journal store not found")]
    StoreNotFound,

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Archive packing or extraction error
    #[error("Archive error: {0}")]
    Archive(String),

    /// Operation was cancelled at an I/O boundary
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl From<zip::result::ZipError> for InkryptError {
    fn from(err: zip::result::ZipError) -> Self {
        InkryptError::Archive(err.to_string())
    }
}
