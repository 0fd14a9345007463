//! Persisted credential settings.
//!
//! Only the salt, the encrypted verification marker and a flag are kept.
//! The PIN and the derived key never touch disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{InkryptError, Result};
use crate::fs::{set_private_permissions, write_atomic};

/// Installation-wide credential record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base64 of the 16-byte PBKDF2 salt.
    #[serde(default)]
    pub pin_salt: Option<String>,
    /// Marker text encrypted under the PIN-derived key.
    #[serde(default)]
    pub verification_blob: Option<String>,
    #[serde(default)]
    pub pin_set: bool,
}

/// Backing store for [`Settings`].
pub trait SettingsStore: Send + Sync {
    /// Load the current settings; a store that was never written yields defaults.
    fn load(&self) -> Result<Settings>;

    /// Replace the stored settings.
    fn save(&self, settings: &Settings) -> Result<()>;

    /// Forget everything. Loading afterwards yields defaults.
    fn clear(&self) -> Result<()>;
}

/// Settings kept as a JSON file, written atomically with owner-only permissions.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(settings)?;
        write_atomic(&self.path, &json)?;
        set_private_permissions(&self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process settings, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<Settings>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Settings>> {
        self.inner
            .lock()
            .map_err(|_| InkryptError::Storage("Settings lock poisoned".to_string()))
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.lock()? = settings.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = Settings::default();
        Ok(())
    }
}

impl<T: SettingsStore + ?Sized> SettingsStore for std::sync::Arc<T> {
    fn load(&self) -> Result<Settings> {
        (**self).load()
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        (**self).save(settings)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Settings {
        Settings {
            pin_salt: Some("c2FsdHNhbHRzYWx0c2FsdA==".to_string()),
            verification_blob: Some("blob".to_string()),
            pin_set: true,
        }
    }

    #[test]
    fn test_file_store_missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested").join("settings.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.json"));
        store.save(&sample()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_store_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.json"));
        store.save(&sample()).unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), Settings::default());

        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, b"{ not json").unwrap();

        let store = FileSettingsStore::new(path);
        assert!(matches!(store.load(), Err(InkryptError::Json { .. })));
    }

    #[test]
    fn test_memory_store_round_trip_and_clear() {
        let store = MemorySettingsStore::new();
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), Settings::default());
    }
}
