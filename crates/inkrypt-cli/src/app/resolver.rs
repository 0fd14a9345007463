//! Path resolution for config and journal files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, ResolvedPaths};
use crate::constants::CONFIG_ENV;
use crate::errors::CliError;

/// Resolve the config file path, checking INKRYPT_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve every path from the config file and CLI overrides.
pub fn resolve_paths(cli: &Cli) -> anyhow::Result<ResolvedPaths> {
    let config = read_config(&resolve_config_path()?)?;
    config.resolve(cli.journal.as_deref())
}

/// Error for commands that need a journal when there is none.
pub fn missing_journal(path: &Path) -> CliError {
    CliError::not_found(
        format!("No journal found at {}", path.display()),
        "Hint: Run `inkrypt init` to create one, or pass --journal /path/to/inkrypt.db",
    )
}
