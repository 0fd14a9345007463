//! PIN unlock with retry logic.

use std::sync::Arc;

use inkrypt_core::auth::FileSettingsStore;
use inkrypt_core::crypto::SymmetricKey;
use inkrypt_core::{AuthSession, AuthState};

use crate::config::ResolvedPaths;
use crate::constants::MAX_PIN_ATTEMPTS;
use crate::errors::CliError;

use super::input::{pin_from_env, prompt_pin};
use super::resolver::missing_journal;

const FORGOTTEN_PIN_HINT: &str =
    "Hint: A forgotten PIN cannot be recovered. `inkrypt reset` erases the journal and starts over.";

/// Unlock `session`, prompting up to three times when interactive.
///
/// A PIN from the environment gets a single attempt.
pub fn unlock_with_retry(
    session: &mut AuthSession<FileSettingsStore>,
    paths: &ResolvedPaths,
    interactive: bool,
) -> anyhow::Result<Arc<SymmetricKey>> {
    if matches!(session.state(), AuthState::SetupRequired) {
        return Err(missing_journal(&paths.journal).into());
    }

    let max_attempts = if pin_from_env().is_none() && interactive {
        MAX_PIN_ATTEMPTS
    } else {
        1
    };
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let pin = prompt_pin(interactive)?;
        if let Some(key) = session.unlock(&pin)? {
            return Ok(key);
        }

        let message = match session.state() {
            AuthState::Error { message, .. } => message.clone(),
            _ => "Incorrect PIN".to_string(),
        };
        let remaining = max_attempts.saturating_sub(attempts);
        if remaining == 0 {
            if max_attempts == 1 {
                return Err(CliError::auth_failed_with_hint(
                    format!("{}.", message),
                    FORGOTTEN_PIN_HINT,
                )
                .into());
            }
            return Err(CliError::auth_failed_with_hint(
                "Too many failed PIN attempts.",
                FORGOTTEN_PIN_HINT,
            )
            .into());
        }
        eprintln!(
            "{}. {} attempt{} remaining.",
            message,
            remaining,
            if remaining == 1 { "" } else { "s" }
        );
    }
}
