//! Age encryption of the serialized journal store.
//!
//! The store file is the whole SQLite image encrypted with age's passphrase
//! recipient. The passphrase comes from [`SymmetricKey::store_passphrase`], so
//! the PIN that unlocks the session also unlocks the store.
//!
//! [`SymmetricKey::store_passphrase`]: crate::crypto::SymmetricKey::store_passphrase

use std::io::{Read, Write};
use std::iter;

use age::secrecy::SecretString;

use crate::error::{InkryptError, Result};

/// Encrypt data using age passphrase-based encryption.
///
/// # Examples
///
/// ```
/// use inkrypt_core::storage::encryption::encrypt;
///
/// let plaintext = b"sqlite image";
/// let encrypted = encrypt(plaintext, "store-passphrase").unwrap();
/// assert_ne!(encrypted.as_slice(), plaintext);
/// ```
pub fn encrypt(data: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let encryptor =
        age::Encryptor::with_user_passphrase(SecretString::from(passphrase.to_string()));

    let mut encrypted = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut encrypted)
        .map_err(|e| InkryptError::Crypto(format!("Failed to create encryptor: {}", e)))?;

    writer
        .write_all(data)
        .map_err(|e| InkryptError::Crypto(format!("Encryption write failed: {}", e)))?;

    writer
        .finish()
        .map_err(|e| InkryptError::Crypto(format!("Encryption finish failed: {}", e)))?;

    Ok(encrypted)
}

/// Decrypt data produced by [`encrypt`].
///
/// # Errors
///
/// Returns `InkryptError::AuthenticationFailure` if the passphrase is wrong
/// or the payload fails its integrity check, and `InkryptError::Crypto` if
/// the data is not an age file at all.
pub fn decrypt(encrypted_data: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let decryptor = age::Decryptor::new(encrypted_data)
        .map_err(|e| InkryptError::Crypto(format!("Failed to create decryptor: {}", e)))?;

    let identity = age::scrypt::Identity::new(SecretString::from(passphrase.to_string()));
    let mut reader = decryptor
        .decrypt(iter::once(&identity as &dyn age::Identity))
        .map_err(|e| match e {
            age::DecryptError::NoMatchingKeys
            | age::DecryptError::DecryptionFailed
            | age::DecryptError::KeyDecryptionFailed => InkryptError::AuthenticationFailure,
            _ => InkryptError::Crypto(format!("Decryption failed: {}", e)),
        })?;

    let mut decrypted = Vec::new();
    reader
        .read_to_end(&mut decrypted)
        .map_err(|_| InkryptError::AuthenticationFailure)?;

    Ok(decrypted)
}
