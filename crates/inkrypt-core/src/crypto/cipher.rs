//! AES-256-GCM field encryption.
//!
//! Each call produces one self-contained blob:
//!
//! ```text
//! base64( [12 bytes: IV] [N bytes: ciphertext] [16 bytes: GCM tag] )
//! ```
//!
//! The IV is drawn fresh for every call, so encrypting the same text twice
//! never yields the same blob. No associated data is bound in.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::key::SymmetricKey;
use crate::error::{InkryptError, Result};

/// GCM nonce length in bytes.
pub const IV_LENGTH: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Shortest decodable blob: an IV and a tag around empty plaintext.
const MIN_BLOB_LENGTH: usize = IV_LENGTH + TAG_LENGTH;

/// Encrypt `plaintext` under `key`, returning a base64 blob.
///
/// # Examples
///
/// ```
/// use inkrypt_core::crypto::{decrypt, encrypt, SymmetricKey};
///
/// let key = SymmetricKey::generate();
/// let blob = encrypt("dear diary", &key).unwrap();
/// assert_eq!(decrypt(&blob, &key).unwrap(), "dear diary");
/// ```
pub fn encrypt(plaintext: &str, key: &SymmetricKey) -> Result<String> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|e| InkryptError::Crypto(format!("Encryption failed: {}", e)))?;

    let mut blob = Vec::with_capacity(IV_LENGTH + ciphertext.len());
    blob.extend_from_slice(nonce.as_slice());
    blob.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(blob))
}

/// Decrypt a blob produced by [`encrypt`].
///
/// # Errors
///
/// Returns `InkryptError::AuthenticationFailure` if:
/// - The key is wrong
/// - The blob was corrupted or truncated
/// - The blob is not valid base64
///
/// No plaintext is released unless the tag verifies.
pub fn decrypt(blob: &str, key: &SymmetricKey) -> Result<String> {
    let bytes = STANDARD
        .decode(blob.as_bytes())
        .map_err(|_| InkryptError::AuthenticationFailure)?;
    if bytes.len() < MIN_BLOB_LENGTH {
        return Err(InkryptError::AuthenticationFailure);
    }

    let (iv, ciphertext) = bytes.split_at(IV_LENGTH);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| InkryptError::AuthenticationFailure)?;

    String::from_utf8(plaintext)
        .map_err(|e| InkryptError::Crypto(format!("Decrypted text is not UTF-8: {}", e)))
}
