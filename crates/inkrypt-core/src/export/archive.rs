//! Password-protected archive packing.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{AesMode, CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{InkryptError, Result};

/// Packs files into, and unpacks them from, a password-encrypted archive.
pub trait ArchiveFacility: Send + Sync {
    /// Write `files` (stored under their file names) into a new archive at `dest`.
    fn create_encrypted_archive(&self, files: &[PathBuf], password: &str, dest: &Path) -> Result<()>;

    /// Extract every file in `archive` into `dest_dir`.
    ///
    /// # Errors
    ///
    /// Any error, including a wrong password, leaves `dest_dir` in an
    /// unspecified state; callers extract into scratch space.
    fn extract_encrypted_archive(&self, archive: &Path, password: &str, dest_dir: &Path) -> Result<()>;
}

/// Zip archives with WinZip AES-256 entry encryption.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveFacility;

impl ArchiveFacility for ZipArchiveFacility {
    fn create_encrypted_archive(&self, files: &[PathBuf], password: &str, dest: &Path) -> Result<()> {
        let mut zip = ZipWriter::new(File::create(dest)?);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .with_aes_encryption(AesMode::Aes256, password);

        for path in files {
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    InkryptError::Archive(format!("Invalid file name: {}", path.display()))
                })?;
            zip.start_file(name, options)?;
            zip.write_all(&fs::read(path)?)?;
        }

        zip.finish()?.sync_all()?;
        Ok(())
    }

    fn extract_encrypted_archive(&self, archive: &Path, password: &str, dest_dir: &Path) -> Result<()> {
        let mut zip = ZipArchive::new(File::open(archive)?)?;

        for index in 0..zip.len() {
            let mut entry = zip.by_index_decrypt(index, password.as_bytes())?;
            if entry.is_dir() {
                continue;
            }
            let Some(relative) = entry.enclosed_name() else {
                tracing::warn!(name = entry.name(), "Skipping archive entry outside extraction root");
                continue;
            };

            let out_path = dest_dir.join(relative);
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&out_path)?;
            io::copy(&mut entry, &mut out)?;
        }

        Ok(())
    }
}
