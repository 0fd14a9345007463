//! Age-encrypted SQLite record store.
//!
//! The database is held in memory. On persist it is serialized, encrypted
//! with age under the store passphrase and written atomically; on open the
//! file is decrypted and deserialized back into memory.

mod row;

use std::fs;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::{Mutex, MutexGuard};

use rusqlite::serialize::OwnedData;
use rusqlite::{params, Connection, DatabaseName, OptionalExtension};
use tokio::sync::watch;

use crate::error::{InkryptError, Result};
use crate::fs::{set_private_permissions, write_atomic};
use crate::storage::encryption::{decrypt, encrypt};
use crate::storage::traits::{ChangeFeed, RecordStore};
use crate::storage::types::{StoredEntry, StoredTemplate};

use row::{entry_from_row, template_from_row, ENTRY_COLUMNS, TEMPLATE_COLUMNS};

const FORMAT_VERSION: &str = "1";

const SCHEMA: &str = r#"
    CREATE TABLE meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE journal_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        template_id INTEGER,
        tags TEXT NOT NULL DEFAULT '',
        media_paths TEXT NOT NULL DEFAULT '',
        voice_note_path TEXT NOT NULL DEFAULT ''
    );

    CREATE INDEX journal_entries_updated_at ON journal_entries (updated_at DESC);

    CREATE TABLE templates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        content TEXT NOT NULL
    );
"#;

/// SQLite-backed [`RecordStore`].
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
    entries_tx: watch::Sender<u64>,
    templates_tx: watch::Sender<u64>,
}

impl SqliteStore {
    /// A store that lives only in memory. `persist` is a no-op.
    pub fn in_memory() -> Result<Self> {
        let conn = Self::initialized_connection()?;
        Ok(Self::from_connection(None, conn))
    }

    /// Create a new encrypted store file at `path` and open it.
    ///
    /// # Errors
    ///
    /// Returns `InkryptError::Storage` if a file already exists at `path`.
    pub fn create(path: &Path, passphrase: &str) -> Result<Self> {
        if path.exists() {
            return Err(InkryptError::Storage(
                "Journal store already exists".to_string(),
            ));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Self::initialized_connection()?;
        let store = Self::from_connection(Some(path.to_path_buf()), conn);
        store.persist(passphrase)?;
        tracing::debug!(path = %path.display(), "Journal store created");
        Ok(store)
    }

    /// Open an existing encrypted store file.
    ///
    /// # Errors
    ///
    /// - `InkryptError::StoreNotFound` if there is no file at `path`
    /// - `InkryptError::AuthenticationFailure` if the passphrase is wrong
    pub fn open(path: &Path, passphrase: &str) -> Result<Self> {
        if !path.exists() {
            return Err(InkryptError::StoreNotFound);
        }

        let encrypted = fs::read(path)?;
        let plaintext = decrypt(&encrypted, passphrase)?;
        let mut conn = Connection::open_in_memory()?;
        let owned_data = Self::owned_data_from_bytes(&plaintext)?;
        conn.deserialize(DatabaseName::Main, owned_data, false)?;

        let format_version: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'format_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if format_version.as_deref() != Some(FORMAT_VERSION) {
            return Err(InkryptError::Storage(format!(
                "Unsupported journal format: {}",
                format_version.unwrap_or_else(|| "unknown".to_string())
            )));
        }

        tracing::debug!(path = %path.display(), "Journal store opened");
        Ok(Self::from_connection(Some(path.to_path_buf()), conn))
    }

    /// Write the current contents to disk, encrypted under `passphrase`.
    pub fn persist(&self, passphrase: &str) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let encrypted = {
            let conn = self.lock_conn()?;
            let data = conn.serialize(DatabaseName::Main)?;
            encrypt(data.as_ref(), passphrase)?
        };
        write_atomic(path, &encrypted)?;
        set_private_permissions(path)?;
        Ok(())
    }

    /// Persist and release the store.
    pub fn close(self, passphrase: &str) -> Result<()> {
        self.persist(passphrase)
    }

    /// Delete the store file at `path`, if any.
    pub fn destroy(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Journal store destroyed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn from_connection(path: Option<PathBuf>, conn: Connection) -> Self {
        let (entries_tx, _) = watch::channel(0);
        let (templates_tx, _) = watch::channel(0);
        Self {
            path,
            conn: Mutex::new(conn),
            entries_tx,
            templates_tx,
        }
    }

    fn initialized_connection() -> Result<Connection> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        let created_at = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["format_version", FORMAT_VERSION],
        )?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?, ?)",
            ["created_at", created_at.as_str()],
        )?;
        Ok(conn)
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| InkryptError::Storage("SQLite connection poisoned".to_string()))
    }

    fn owned_data_from_bytes(bytes: &[u8]) -> Result<OwnedData> {
        if bytes.is_empty() {
            return Err(InkryptError::Storage("SQLite payload is empty".to_string()));
        }

        let size: i32 = bytes
            .len()
            .try_into()
            .map_err(|_| InkryptError::Storage("SQLite payload too large".to_string()))?;

        // SAFETY: sqlite3_malloc returns a valid pointer or null; null is
        // checked below. `size` fits in i32.
        let raw = unsafe { rusqlite::ffi::sqlite3_malloc(size) as *mut u8 };
        let ptr = NonNull::new(raw)
            .ok_or_else(|| InkryptError::Storage("SQLite allocation failed".to_string()))?;

        // SAFETY:
        // - `ptr` was just allocated with exactly `bytes.len()` bytes
        // - the source slice is valid for `bytes.len()` reads and cannot overlap
        //   fresh heap memory
        // - `OwnedData` takes ownership and frees it through SQLite
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
            Ok(OwnedData::from_raw_nonnull(ptr, bytes.len()))
        }
    }

    fn bump(feed: &watch::Sender<u64>) {
        feed.send_modify(|version| *version += 1);
    }
}

impl RecordStore for SqliteStore {
    fn insert_entry(&self, entry: &StoredEntry) -> Result<i64> {
        let id = {
            let mut conn = self.lock_conn()?;
            let tx = conn.transaction()?;
            tx.execute(
                r#"
                INSERT INTO journal_entries
                    (title, content, created_at, updated_at, template_id, tags, media_paths, voice_note_path)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    entry.title,
                    entry.content,
                    entry.created_at,
                    entry.updated_at,
                    entry.template_id,
                    entry.tags,
                    entry.media_paths,
                    entry.voice_note_path,
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            id
        };
        Self::bump(&self.entries_tx);
        Ok(id)
    }

    fn update_entry(&self, entry: &StoredEntry) -> Result<()> {
        let changed = {
            let mut conn = self.lock_conn()?;
            let tx = conn.transaction()?;
            let changed = tx.execute(
                r#"
                UPDATE journal_entries
                SET title = ?2, content = ?3, created_at = ?4, updated_at = ?5,
                    template_id = ?6, tags = ?7, media_paths = ?8, voice_note_path = ?9
                WHERE id = ?1
                "#,
                params![
                    entry.id,
                    entry.title,
                    entry.content,
                    entry.created_at,
                    entry.updated_at,
                    entry.template_id,
                    entry.tags,
                    entry.media_paths,
                    entry.voice_note_path,
                ],
            )?;
            tx.commit()?;
            changed
        };
        if changed == 0 {
            return Err(InkryptError::NotFound(format!("Entry {}", entry.id)));
        }
        Self::bump(&self.entries_tx);
        Ok(())
    }

    fn delete_entry(&self, id: i64) -> Result<bool> {
        let changed = self
            .lock_conn()?
            .execute("DELETE FROM journal_entries WHERE id = ?", [id])?;
        if changed > 0 {
            Self::bump(&self.entries_tx);
        }
        Ok(changed > 0)
    }

    fn get_entry(&self, id: i64) -> Result<Option<StoredEntry>> {
        let conn = self.lock_conn()?;
        let entry = conn
            .query_row(
                &format!("SELECT {} FROM journal_entries WHERE id = ?", ENTRY_COLUMNS),
                [id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn list_entries(&self) -> Result<Vec<StoredEntry>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM journal_entries ORDER BY updated_at DESC, id DESC",
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn search_entries(&self, _query: &str) -> Result<Vec<StoredEntry>> {
        // Title and content are ciphertext here; every entry is a candidate.
        self.list_entries()
    }

    fn subscribe_entries(&self) -> ChangeFeed {
        self.entries_tx.subscribe()
    }

    fn insert_template(&self, template: &StoredTemplate) -> Result<i64> {
        let id = {
            let conn = self.lock_conn()?;
            conn.execute(
                "INSERT INTO templates (name, content) VALUES (?1, ?2)",
                params![template.name, template.content],
            )?;
            conn.last_insert_rowid()
        };
        Self::bump(&self.templates_tx);
        Ok(id)
    }

    fn update_template(&self, template: &StoredTemplate) -> Result<()> {
        let changed = self.lock_conn()?.execute(
            "UPDATE templates SET name = ?2, content = ?3 WHERE id = ?1",
            params![template.id, template.name, template.content],
        )?;
        if changed == 0 {
            return Err(InkryptError::NotFound(format!("Template {}", template.id)));
        }
        Self::bump(&self.templates_tx);
        Ok(())
    }

    fn delete_template(&self, id: i64) -> Result<bool> {
        let changed = self
            .lock_conn()?
            .execute("DELETE FROM templates WHERE id = ?", [id])?;
        if changed > 0 {
            Self::bump(&self.templates_tx);
        }
        Ok(changed > 0)
    }

    fn get_template(&self, id: i64) -> Result<Option<StoredTemplate>> {
        let conn = self.lock_conn()?;
        let template = conn
            .query_row(
                &format!("SELECT {} FROM templates WHERE id = ?", TEMPLATE_COLUMNS),
                [id],
                template_from_row,
            )
            .optional()?;
        Ok(template)
    }

    fn list_templates(&self) -> Result<Vec<StoredTemplate>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM templates ORDER BY id",
            TEMPLATE_COLUMNS
        ))?;
        let templates = stmt
            .query_map([], template_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(templates)
    }

    fn subscribe_templates(&self) -> ChangeFeed {
        self.templates_tx.subscribe()
    }

    fn clear_all(&self) -> Result<()> {
        {
            let mut conn = self.lock_conn()?;
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM journal_entries", [])?;
            tx.execute("DELETE FROM templates", [])?;
            tx.commit()?;
        }
        Self::bump(&self.entries_tx);
        Self::bump(&self.templates_tx);
        Ok(())
    }
}
