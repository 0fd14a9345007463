//! An unlocked journal: repository, media vault and exporter over one key.

use std::path::Path;
use std::sync::Arc;

use inkrypt_core::crypto::SymmetricKey;
use inkrypt_core::media::MediaVault;
use inkrypt_core::{ExportImportManager, InkryptError, JournalRepository, SqliteStore};

use crate::config::ResolvedPaths;
use crate::errors::CliError;

use super::resolver::missing_journal;

pub struct Journal {
    repo: JournalRepository<SqliteStore>,
    key: Arc<SymmetricKey>,
    paths: ResolvedPaths,
}

impl Journal {
    /// Decrypt the store at `paths.journal` with the session key.
    pub fn open(paths: &ResolvedPaths, key: Arc<SymmetricKey>) -> anyhow::Result<Self> {
        let store = match SqliteStore::open(&paths.journal, &key.store_passphrase()) {
            Ok(store) => store,
            Err(InkryptError::StoreNotFound) => return Err(missing_journal(&paths.journal).into()),
            Err(InkryptError::AuthenticationFailure) => {
                return Err(CliError::auth_failed(format!(
                    "The journal at {} does not belong to this PIN.",
                    paths.journal.display()
                ))
                .into())
            }
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(path = %paths.journal.display(), "Journal opened");

        Ok(Self {
            repo: JournalRepository::new(Arc::new(store), Arc::clone(&key)),
            key,
            paths: paths.clone(),
        })
    }

    pub fn repo(&self) -> &JournalRepository<SqliteStore> {
        &self.repo
    }

    pub fn media(&self) -> MediaVault {
        MediaVault::new(&self.paths.media_dir, Arc::clone(&self.key))
    }

    pub fn exporter(&self) -> ExportImportManager<SqliteStore> {
        let manager = ExportImportManager::new(self.repo.clone(), &self.paths.export_dir);
        match &self.paths.scratch_dir {
            Some(dir) => manager.with_scratch_dir(dir),
            None => manager,
        }
    }

    pub fn path(&self) -> &Path {
        &self.paths.journal
    }

    /// Write the store back to disk. Every mutating command ends here.
    pub fn save(&self) -> anyhow::Result<()> {
        self.repo.store().persist(&self.key.store_passphrase())?;
        Ok(())
    }
}
