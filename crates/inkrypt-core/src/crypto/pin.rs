//! PIN validation.
//!
//! Length rules are checked before any key derivation or storage access.

use crate::error::{InkryptError, Result};

/// Minimum PIN length in characters.
pub const MIN_PIN_LENGTH: usize = 4;

/// Maximum PIN length in characters.
pub const MAX_PIN_LENGTH: usize = 16;

/// Validate that a PIN may be used to set up the journal.
///
/// # Requirements
///
/// - Not empty or only whitespace
/// - Between 4 and 16 characters long
///
/// # Examples
///
/// ```
/// use inkrypt_core::crypto::validate_pin;
///
/// assert!(validate_pin("1234").is_ok());
/// assert!(validate_pin("123").is_err());
/// ```
pub fn validate_pin(pin: &str) -> Result<()> {
    if pin.trim().is_empty() {
        return Err(InkryptError::InvalidInput("PIN is required".to_string()));
    }

    let length = pin.chars().count();
    if length < MIN_PIN_LENGTH {
        return Err(InkryptError::InvalidInput(format!(
            "PIN must be at least {} characters",
            MIN_PIN_LENGTH
        )));
    }
    if length > MAX_PIN_LENGTH {
        return Err(InkryptError::InvalidInput(format!(
            "PIN must be at most {} characters",
            MAX_PIN_LENGTH
        )));
    }

    Ok(())
}
