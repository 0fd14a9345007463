//! # Inkrypt Core
//!
//! Core library for Inkrypt - a PIN-locked personal journal whose entries are
//! encrypted field by field at rest.
//!
//! This crate provides the encryption primitive, credential handling, the
//! encrypting repository and the export/import codec, independent of any
//! user interface.
//!
//! ## Architecture
//!
//! - **crypto**: PBKDF2 key derivation and AES-256-GCM field blobs
//! - **auth**: PIN setup/verification and the auth state machine
//! - **session**: the authenticated session holding the key
//! - **storage**: record store trait and the age-encrypted SQLite store
//! - **repository**: field-level encryption between domain records and the store
//! - **export**: markdown and encrypted-archive bundles
//! - **media**: encrypted attachments

pub mod auth;
pub mod crypto;
pub mod error;
pub mod export;
pub mod fs;
pub mod media;
pub mod repository;
pub mod session;
pub mod storage;

pub use auth::{AuthEvent, AuthState, CredentialVerifier};
pub use error::{InkryptError, Result};
pub use export::{ExportImportManager, ImportOutcome};
pub use repository::{DecryptedEntry, DecryptedStream, DecryptedTemplate, JournalRepository};
pub use session::AuthSession;
pub use storage::{RecordStore, SqliteStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
