//! Export and import of the decrypted journal.
//!
//! Two bundle kinds are supported:
//!
//! - **Markdown**: one plain `.md` file ([`CombinedMarkdown`]). Not encrypted.
//! - **Encrypted archive**: a zip of per-entry `.md` files ([`EntryMarkdown`])
//!   with AES-256 entry encryption under a caller-chosen password.
//!
//! Imports always insert new entries stamped with the import time; nothing
//! is merged or deduplicated.

pub mod archive;
pub mod markdown;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tempfile::TempDir;

use crate::error::{InkryptError, Result};
use crate::fs::write_atomic;
use crate::repository::{now_millis, DecryptedEntry, JournalRepository};
use crate::storage::RecordStore;

pub use archive::{ArchiveFacility, ZipArchiveFacility};
pub use markdown::{format_date, CombinedMarkdown, EntryMarkdown};

/// A named text document produced by a [`BundleFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDocument {
    pub name: String,
    pub text: String,
}

/// An entry recovered from a bundle, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub title: String,
    pub content: String,
}

/// A textual layout for exported entries.
pub trait BundleFormat {
    /// Render `entries` as one or more documents.
    fn encode(&self, entries: &[DecryptedEntry], exported_at: DateTime<Utc>) -> Vec<BundleDocument>;

    /// Recover the importable entries from one document.
    fn decode(&self, text: &str) -> Vec<ParsedEntry>;
}

/// Result of an import that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// This many entries were inserted.
    Imported(usize),
    /// The archive password was blank or did not open the archive.
    PasswordRejected,
    /// The source file is missing or unreadable.
    SourceUnavailable,
}

impl ImportOutcome {
    /// Numeric form: the count, `-1` for a rejected password, `-2` for an
    /// unavailable source.
    pub fn code(&self) -> i64 {
        match self {
            ImportOutcome::Imported(count) => *count as i64,
            ImportOutcome::PasswordRejected => -1,
            ImportOutcome::SourceUnavailable => -2,
        }
    }
}

/// Default file name for an export created at `at`.
pub fn default_export_name(at: DateTime<Local>, extension: &str) -> String {
    format!("inkrypt_export_{}.{}", at.format("%Y%m%d_%H%M%S"), extension)
}

/// Drives bundle formats against a repository.
pub struct ExportImportManager<S: RecordStore + ?Sized, A: ArchiveFacility = ZipArchiveFacility> {
    repository: JournalRepository<S>,
    archive: A,
    export_dir: PathBuf,
    scratch_dir: Option<PathBuf>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<S: RecordStore + ?Sized> ExportImportManager<S, ZipArchiveFacility> {
    /// A manager writing default-named exports into `export_dir`.
    pub fn new(repository: JournalRepository<S>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            archive: ZipArchiveFacility,
            export_dir: export_dir.into(),
            scratch_dir: None,
            cancel: None,
        }
    }
}

impl<S: RecordStore + ?Sized, A: ArchiveFacility> ExportImportManager<S, A> {
    /// Swap the archive implementation.
    pub fn with_archive<B: ArchiveFacility>(self, archive: B) -> ExportImportManager<S, B> {
        ExportImportManager {
            repository: self.repository,
            archive,
            export_dir: self.export_dir,
            scratch_dir: self.scratch_dir,
            cancel: self.cancel,
        }
    }

    /// Create scratch directories under `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Abort at the next file boundary once `flag` is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    // --- Export ---

    /// Export every entry to a default-named `.md` file in the export directory.
    pub fn export_to_markdown(&self) -> Result<PathBuf> {
        let dest = self.default_destination("md")?;
        self.export_to_markdown_to(&dest)?;
        Ok(dest)
    }

    /// Export every entry as one markdown document at `dest`.
    pub fn export_to_markdown_to(&self, dest: &Path) -> Result<()> {
        let entries = self.repository.all_entries()?;
        self.check_cancelled()?;

        let text: String = CombinedMarkdown
            .encode(&entries, Utc::now())
            .into_iter()
            .map(|doc| doc.text)
            .collect();
        write_atomic(dest, text.as_bytes())?;

        tracing::debug!(count = entries.len(), path = %dest.display(), "Markdown export written");
        Ok(())
    }

    /// Export every entry to a default-named `.zip` file in the export directory.
    pub fn export_to_encrypted_archive(&self, password: &str) -> Result<PathBuf> {
        validate_export_password(password)?;
        let dest = self.default_destination("zip")?;
        self.export_to_encrypted_archive_to(password, &dest)?;
        Ok(dest)
    }

    /// Export every entry into an encrypted archive at `dest`.
    ///
    /// # Errors
    ///
    /// Returns `InkryptError::InvalidInput` for a blank password before any
    /// entry is read or any file is written.
    pub fn export_to_encrypted_archive_to(&self, password: &str, dest: &Path) -> Result<()> {
        validate_export_password(password)?;

        let entries = self.repository.all_entries()?;
        let scratch = self.scratch("inkrypt_export_")?;

        let mut files = Vec::with_capacity(entries.len());
        for doc in EntryMarkdown.encode(&entries, Utc::now()) {
            self.check_cancelled()?;
            let path = scratch.path().join(&doc.name);
            fs::write(&path, doc.text)?;
            files.push(path);
        }
        self.check_cancelled()?;

        let staging = tempfile::Builder::new()
            .prefix(".inkrypt_export")
            .suffix(".tmp")
            .tempfile_in(parent_dir(dest))?;
        self.archive
            .create_encrypted_archive(&files, password, staging.path())?;
        staging
            .persist(dest)
            .map_err(|e| InkryptError::Io { source: e.error })?;

        tracing::debug!(count = files.len(), path = %dest.display(), "Archive export written");
        Ok(())
    }

    // --- Import ---

    /// Import entries from a markdown export.
    pub fn import_from_markdown(&self, source: &Path) -> Result<ImportOutcome> {
        let text = match fs::read_to_string(source) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(error = %e, path = %source.display(), "Markdown source unavailable");
                return Ok(ImportOutcome::SourceUnavailable);
            }
        };
        self.check_cancelled()?;

        let count = self.insert_parsed(CombinedMarkdown.decode(&text))?;
        Ok(ImportOutcome::Imported(count))
    }

    /// Import entries from an encrypted archive export.
    ///
    /// A missing source is reported before the password is looked at.
    /// Members that are not valid UTF-8 are decoded lossily rather than
    /// aborting an import that has already inserted earlier members.
    pub fn import_from_encrypted_archive(
        &self,
        source: &Path,
        password: &str,
    ) -> Result<ImportOutcome> {
        if fs::File::open(source).is_err() || !source.is_file() {
            return Ok(ImportOutcome::SourceUnavailable);
        }
        if password.trim().is_empty() {
            return Ok(ImportOutcome::PasswordRejected);
        }

        let scratch = self.scratch("inkrypt_import_")?;
        if let Err(e) = self
            .archive
            .extract_encrypted_archive(source, password, scratch.path())
        {
            tracing::debug!(error = %e, "Archive extraction failed");
            return Ok(ImportOutcome::PasswordRejected);
        }

        let mut documents: Vec<PathBuf> = fs::read_dir(scratch.path())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
            .collect();
        documents.sort();

        let mut count = 0;
        for path in documents {
            self.check_cancelled()?;
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Skipping unreadable archive member");
                    continue;
                }
            };
            let text = String::from_utf8_lossy(&bytes);
            count += self.insert_parsed(EntryMarkdown.decode(&text))?;
        }

        Ok(ImportOutcome::Imported(count))
    }

    // --- Helpers ---

    fn insert_parsed(&self, parsed: Vec<ParsedEntry>) -> Result<usize> {
        let mut count = 0;
        for ParsedEntry { title, content } in parsed {
            let now = now_millis();
            let entry = DecryptedEntry {
                created_at: now,
                updated_at: now,
                ..DecryptedEntry::new(title, content)
            };
            self.repository.insert_entry(&entry)?;
            count += 1;
        }
        Ok(count)
    }

    fn default_destination(&self, extension: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.export_dir)?;
        Ok(self
            .export_dir
            .join(default_export_name(Local::now(), extension)))
    }

    /// A fresh, uniquely named scratch directory, removed when dropped.
    fn scratch(&self, prefix: &str) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match &self.scratch_dir {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::SeqCst) => Err(InkryptError::Cancelled),
            _ => Ok(()),
        }
    }
}

fn validate_export_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(InkryptError::InvalidInput(
            "Export password cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}
