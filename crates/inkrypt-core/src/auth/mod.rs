//! PIN setup and verification.
//!
//! A PIN is never stored. Setup persists a random salt and a known marker
//! encrypted under the PIN-derived key; verification re-derives the key and
//! accepts it only if the marker decrypts back intact.

pub mod settings;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::{decrypt, derive_key, encrypt, generate_salt, validate_pin, Salt, SymmetricKey};
use crate::error::Result;

pub use settings::{FileSettingsStore, MemorySettingsStore, Settings, SettingsStore};

/// Plaintext encrypted at setup and checked on every unlock.
pub const VERIFICATION_MARKER: &str = "inkrypt_verification";

/// Authentication lifecycle of one application session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Settings have not been inspected yet.
    Initializing,
    /// No PIN has been set up.
    SetupRequired,
    /// A PIN exists and the session key is not held.
    Locked,
    /// The session key is held.
    Authenticated,
    /// A setup or unlock attempt failed. `resume` is the state to return to.
    Error {
        message: String,
        resume: Box<AuthState>,
    },
}

/// Inputs that move an [`AuthState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Settings were inspected.
    Checked { pin_set: bool },
    PinSetUp,
    SetupFailed(String),
    PinVerified,
    PinRejected(String),
    ClearError,
    Lock,
    Reset,
}

impl AuthState {
    /// Apply `event`, returning the next state.
    ///
    /// Events that make no sense in the current state leave it unchanged.
    /// From `Error`, attempt events apply to the state being resumed, so a
    /// retry does not need an explicit `ClearError` first.
    pub fn transition(self, event: AuthEvent) -> AuthState {
        use AuthEvent as E;
        use AuthState as S;

        match (self, event) {
            (_, E::Reset) => S::SetupRequired,
            (S::Initializing, E::Checked { pin_set: true }) => S::Locked,
            (S::Initializing, E::Checked { pin_set: false }) => S::SetupRequired,
            (S::SetupRequired, E::PinSetUp) => S::Authenticated,
            (S::SetupRequired, E::SetupFailed(message)) => S::Error {
                message,
                resume: Box::new(S::SetupRequired),
            },
            (S::Locked, E::PinVerified) => S::Authenticated,
            (S::Locked, E::PinRejected(message)) => S::Error {
                message,
                resume: Box::new(S::Locked),
            },
            (S::Authenticated, E::Lock) => S::Locked,
            (S::Error { resume, .. }, E::ClearError) => *resume,
            (S::Error { resume, .. }, event @ (E::PinSetUp
            | E::SetupFailed(_)
            | E::PinVerified
            | E::PinRejected(_))) => (*resume).transition(event),
            (state, _) => state,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}

/// Sets up and checks the PIN against persisted [`Settings`].
#[derive(Debug)]
pub struct CredentialVerifier<S: SettingsStore> {
    settings: S,
}

impl<S: SettingsStore> CredentialVerifier<S> {
    pub fn new(settings: S) -> Self {
        Self { settings }
    }

    /// Whether a PIN has been set up on this installation.
    pub fn is_pin_set(&self) -> Result<bool> {
        Ok(self.settings.load()?.pin_set)
    }

    /// Set up a new PIN and return the session key derived from it.
    ///
    /// # Errors
    ///
    /// Returns `InkryptError::InvalidInput` if the PIN is blank, shorter than 4
    /// or longer than 16 characters. Nothing is derived or written in that case.
    pub fn setup_pin(&self, pin: &str) -> Result<SymmetricKey> {
        validate_pin(pin)?;

        let salt = generate_salt();
        let key = derive_key(pin, &salt);
        let verification_blob = encrypt(VERIFICATION_MARKER, &key)?;

        self.settings.save(&Settings {
            pin_salt: Some(STANDARD.encode(salt)),
            verification_blob: Some(verification_blob),
            pin_set: true,
        })?;
        tracing::debug!("PIN set up");

        Ok(key)
    }

    /// Check `pin` and return the session key if it is correct.
    ///
    /// A wrong PIN, a blank PIN and missing or unreadable credential settings
    /// all yield `Ok(None)`. Only failures to read the settings store itself
    /// are errors.
    pub fn verify_pin(&self, pin: &str) -> Result<Option<SymmetricKey>> {
        if pin.trim().is_empty() {
            return Ok(None);
        }

        let settings = self.settings.load()?;
        let (Some(salt_b64), Some(blob)) = (settings.pin_salt, settings.verification_blob) else {
            return Ok(None);
        };

        let Some(salt) = decode_salt(&salt_b64) else {
            tracing::warn!("Stored PIN salt is malformed");
            return Ok(None);
        };

        let key = derive_key(pin, &salt);
        match decrypt(&blob, &key) {
            Ok(marker) if marker == VERIFICATION_MARKER => Ok(Some(key)),
            _ => Ok(None),
        }
    }

    /// Forget the PIN: salt, marker and flag are all cleared.
    pub fn reset(&self) -> Result<()> {
        self.settings.clear()?;
        tracing::debug!("Credential settings cleared");
        Ok(())
    }
}

fn decode_salt(encoded: &str) -> Option<Salt> {
    STANDARD.decode(encoded).ok()?.try_into().ok()
}
