//! Cryptographic operations for Inkrypt.
//!
//! - **PBKDF2-HMAC-SHA256** turns a PIN and a per-installation salt into a
//!   256-bit session key
//! - **AES-256-GCM** encrypts individual fields into self-contained base64 blobs
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the journal store or settings file
//! - Tampering with stored ciphertext
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session
//! - Metadata leakage (timestamps, ids, counts)

pub mod cipher;
pub mod key;
pub mod pin;

pub use cipher::{decrypt, encrypt};
pub use key::{derive_key, generate_salt, Salt, SymmetricKey};
pub use pin::validate_pin;
