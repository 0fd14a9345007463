//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! This module turns a low-entropy PIN into a 256-bit symmetric key. The
//! iteration count makes each guess expensive; the per-installation salt
//! makes precomputed tables useless.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{ZeroizeOnDrop, Zeroizing};

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256).
pub const KEY_LENGTH: usize = 32;

/// Length of the per-installation salt in bytes.
pub const SALT_LENGTH: usize = 16;

/// Random salt fed to [`derive_key`].
pub type Salt = [u8; SALT_LENGTH];

/// A symmetric session key.
///
/// Key material is zeroized from memory when dropped and never shows up in
/// `Debug` output. The key is never persisted.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SymmetricKey {
    key: [u8; KEY_LENGTH],
}

impl SymmetricKey {
    /// Wrap raw key bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure source.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Generate a random key (not PIN-derived).
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LENGTH];
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Passphrase used to encrypt the journal store at rest.
    ///
    /// Derived from the key itself, so unlocking with the PIN is enough to
    /// open the store.
    pub fn store_passphrase(&self) -> Zeroizing<String> {
        Zeroizing::new(STANDARD.encode(self.key))
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random salt from the OS CSPRNG.
pub fn generate_salt() -> Salt {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a session key from a PIN.
///
/// Deterministic: the same PIN and salt always produce the same key. No length
/// rules are enforced here; see [`crate::crypto::validate_pin`].
///
/// # Examples
///
/// ```
/// use inkrypt_core::crypto::{derive_key, generate_salt};
///
/// let salt = generate_salt();
/// let key = derive_key("1234", &salt);
/// assert_eq!(key.as_bytes(), derive_key("1234", &salt).as_bytes());
/// ```
pub fn derive_key(pin: &str, salt: &Salt) -> SymmetricKey {
    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(pin.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key_bytes);
    let key = SymmetricKey::from_bytes(key_bytes);
    zeroize::Zeroize::zeroize(&mut key_bytes);
    key
}
