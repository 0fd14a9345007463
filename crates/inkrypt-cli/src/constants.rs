//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (journal, entry, template, import source).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong PIN, too many attempts).
    pub const AUTH_FAILED: i32 = 5;

    /// An archive import rejected its password.
    pub const IMPORT_REJECTED: i32 = 6;
}

/// PIN supplied non-interactively.
pub const PIN_ENV: &str = "INKRYPT_PIN";

/// Archive password supplied non-interactively.
pub const ARCHIVE_PASSWORD_ENV: &str = "INKRYPT_ARCHIVE_PASSWORD";

/// Config file override.
pub const CONFIG_ENV: &str = "INKRYPT_CONFIG";

/// Log filter directives.
pub const LOG_ENV: &str = "INKRYPT_LOG";

/// PIN prompts allowed per interactive unlock.
pub const MAX_PIN_ATTEMPTS: u32 = 3;
