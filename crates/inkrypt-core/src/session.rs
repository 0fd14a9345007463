//! Authenticated session.
//!
//! Owns the auth state machine and, while authenticated, the session key.
//! Callers open the journal store with [`AuthSession::key`] and hand it to
//! the repository themselves.

use std::sync::Arc;

use crate::auth::{AuthEvent, AuthState, CredentialVerifier, SettingsStore};
use crate::crypto::SymmetricKey;
use crate::error::{InkryptError, Result};

/// Message recorded when an unlock attempt fails.
pub const INCORRECT_PIN: &str = "Incorrect PIN";

pub struct AuthSession<S: SettingsStore> {
    verifier: CredentialVerifier<S>,
    state: AuthState,
    key: Option<Arc<SymmetricKey>>,
}

impl<S: SettingsStore> AuthSession<S> {
    /// Start a session, inspecting settings to decide between setup and unlock.
    pub fn start(verifier: CredentialVerifier<S>) -> Result<Self> {
        let pin_set = verifier.is_pin_set()?;
        let state = AuthState::Initializing.transition(AuthEvent::Checked { pin_set });
        tracing::debug!(?state, "Auth session started");
        Ok(Self {
            verifier,
            state,
            key: None,
        })
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// The session key, present only while authenticated.
    pub fn key(&self) -> Option<Arc<SymmetricKey>> {
        self.key.clone()
    }

    fn apply(&mut self, event: AuthEvent) {
        let current = std::mem::replace(&mut self.state, AuthState::Initializing);
        self.state = current.transition(event);
    }

    fn awaiting(&self, wanted: &AuthState) -> bool {
        match &self.state {
            AuthState::Error { resume, .. } => resume.as_ref() == wanted,
            state => state == wanted,
        }
    }

    /// Set up the first PIN and become authenticated.
    ///
    /// Validation failures move the session to `Error` and are returned.
    pub fn setup_pin(&mut self, pin: &str) -> Result<Arc<SymmetricKey>> {
        if !self.awaiting(&AuthState::SetupRequired) {
            return Err(InkryptError::InvalidInput(
                "A PIN is already set up".to_string(),
            ));
        }

        match self.verifier.setup_pin(pin) {
            Ok(key) => {
                let key = Arc::new(key);
                self.key = Some(Arc::clone(&key));
                self.apply(AuthEvent::PinSetUp);
                Ok(key)
            }
            Err(err) => {
                let message = match &err {
                    InkryptError::InvalidInput(message) => message.clone(),
                    other => other.to_string(),
                };
                self.apply(AuthEvent::SetupFailed(message));
                Err(err)
            }
        }
    }

    /// Try to unlock with `pin`.
    ///
    /// Returns the session key on success. A wrong PIN returns `Ok(None)` and
    /// leaves the session in `Error` until cleared or retried.
    pub fn unlock(&mut self, pin: &str) -> Result<Option<Arc<SymmetricKey>>> {
        if !self.awaiting(&AuthState::Locked) {
            return Err(InkryptError::InvalidInput(
                "Session is not locked".to_string(),
            ));
        }

        match self.verifier.verify_pin(pin)? {
            Some(key) => {
                let key = Arc::new(key);
                self.key = Some(Arc::clone(&key));
                self.apply(AuthEvent::PinVerified);
                Ok(Some(key))
            }
            None => {
                self.apply(AuthEvent::PinRejected(INCORRECT_PIN.to_string()));
                Ok(None)
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.apply(AuthEvent::ClearError);
    }

    /// Drop the session key and return to `Locked`.
    pub fn lock(&mut self) {
        self.key = None;
        self.apply(AuthEvent::Lock);
    }

    /// Erase the PIN and the journal contents.
    ///
    /// `destroy_store` removes the store's data. The session ends in
    /// `SetupRequired` even if a step fails; the first failure is returned.
    pub fn reset_app<F>(&mut self, destroy_store: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.key = None;
        let cleared = self.verifier.reset();
        let destroyed = destroy_store();
        self.apply(AuthEvent::Reset);
        tracing::debug!("Application reset");
        cleared.and(destroyed)
    }
}

impl<S: SettingsStore> std::fmt::Debug for AuthSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("state", &self.state)
            .field("has_key", &self.key.is_some())
            .finish()
    }
}
