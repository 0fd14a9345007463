//! Application context for the Inkrypt CLI.
//!
//! Bundles CLI arguments with lazily-resolved paths and opens sessions and
//! journals on behalf of command handlers.

use std::io::IsTerminal;

use once_cell::unsync::OnceCell;

use inkrypt_core::auth::FileSettingsStore;
use inkrypt_core::{AuthSession, CredentialVerifier};

use crate::cli::Cli;
use crate::config::ResolvedPaths;

use super::journal::Journal;
use super::resolver::resolve_paths;
use super::unlock::unlock_with_retry;

pub struct AppContext<'a> {
    cli: &'a Cli,
    paths: OnceCell<ResolvedPaths>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            paths: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn no_input(&self) -> bool {
        self.cli.no_input
    }

    /// Prompts are allowed only on a terminal without `--no-input`.
    pub fn interactive(&self) -> bool {
        std::io::stdin().is_terminal() && !self.cli.no_input
    }

    /// Resolved paths, loading config on first use.
    pub fn paths(&self) -> anyhow::Result<&ResolvedPaths> {
        self.paths.get_or_try_init(|| resolve_paths(self.cli))
    }

    /// Start an auth session over the settings file.
    pub fn session(&self) -> anyhow::Result<AuthSession<FileSettingsStore>> {
        let settings = FileSettingsStore::new(&self.paths()?.settings);
        Ok(AuthSession::start(CredentialVerifier::new(settings))?)
    }

    /// Unlock with the PIN and open the journal.
    pub fn open_journal(&self) -> anyhow::Result<Journal> {
        let paths = self.paths()?;
        let mut session = self.session()?;
        let key = unlock_with_retry(&mut session, paths, self.interactive())?;
        Journal::open(paths, key)
    }
}
