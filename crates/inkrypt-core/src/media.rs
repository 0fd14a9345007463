//! Encrypted media attachments.
//!
//! Each attachment is stored as a single field blob: the raw bytes are
//! base64-encoded and the result encrypted under the session key. Files are
//! handled whole and in memory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use uuid::Uuid;

use crate::crypto::{decrypt, encrypt, SymmetricKey};
use crate::error::Result;
use crate::fs::{set_private_permissions, write_atomic};

/// Kind of attachment; decides the subdirectory and file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    VoiceNote,
}

impl MediaKind {
    fn directory(self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::VoiceNote => "voice_notes",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "img",
            MediaKind::VoiceNote => "voice",
        }
    }
}

/// Directory of encrypted attachments.
#[derive(Debug, Clone)]
pub struct MediaVault {
    root: PathBuf,
    key: Arc<SymmetricKey>,
}

impl MediaVault {
    pub fn new(root: impl Into<PathBuf>, key: Arc<SymmetricKey>) -> Self {
        Self {
            root: root.into(),
            key,
        }
    }

    /// Encrypt `bytes` into a new file and return its path.
    pub fn save(&self, bytes: &[u8], kind: MediaKind) -> Result<PathBuf> {
        let dir = self.root.join(kind.directory());
        fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}_{}.enc", kind.prefix(), Uuid::new_v4().simple()));
        let blob = encrypt(&STANDARD.encode(bytes), &self.key)?;
        write_atomic(&path, blob.as_bytes())?;
        set_private_permissions(&path)?;

        tracing::debug!(path = %path.display(), "Media saved");
        Ok(path)
    }

    /// Decrypt an attachment.
    ///
    /// A missing file or one that does not authenticate yields `Ok(None)`.
    pub fn load(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        let blob = match fs::read_to_string(path) {
            Ok(blob) => blob,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Ok(encoded) = decrypt(blob.trim(), &self.key) else {
            tracing::warn!(path = %path.display(), "Media failed authentication");
            return Ok(None);
        };
        Ok(STANDARD.decode(encoded).ok())
    }

    /// Remove an attachment. Failures are logged and otherwise ignored.
    pub fn delete(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            tracing::debug!(error = %e, path = %path.display(), "Media delete failed");
        }
    }
}
