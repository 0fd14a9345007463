//! Field-encrypting journal repository.
//!
//! Sits between plaintext [`DecryptedEntry`] / [`DecryptedTemplate`] values
//! and a [`RecordStore`] that only ever sees ciphertext for sensitive
//! fields.
//!
//! Reads never fail because of one bad record. A record whose title or
//! content (name or content for templates) does not authenticate is treated
//! as unavailable: `get_*` yields `None` and listings leave it out. Optional
//! fields that do not authenticate degrade to empty values.

mod stream;
mod types;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::crypto::{decrypt, encrypt, SymmetricKey};
use crate::error::Result;
use crate::storage::{RecordStore, StoredEntry, StoredTemplate};

pub use stream::DecryptedStream;
pub use types::{DecryptedEntry, DecryptedTemplate};
pub(crate) use types::now_millis;

const LIST_SEPARATOR: &str = ",";

/// Encrypting repository over a shared store handle and session key.
pub struct JournalRepository<S: RecordStore + ?Sized> {
    store: Arc<S>,
    key: Arc<SymmetricKey>,
}

impl<S: RecordStore + ?Sized> Clone for JournalRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: Arc::clone(&self.key),
        }
    }
}

impl<S: RecordStore + ?Sized> std::fmt::Debug for JournalRepository<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalRepository")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<S: RecordStore + ?Sized> JournalRepository<S> {
    pub fn new(store: Arc<S>, key: Arc<SymmetricKey>) -> Self {
        Self { store, key }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // --- Entries ---

    /// Encrypt and insert `entry`, returning the new id. `entry.id` is ignored.
    pub fn insert_entry(&self, entry: &DecryptedEntry) -> Result<i64> {
        let stored = self.encrypt_entry(entry)?;
        let id = self.store.insert_entry(&stored)?;
        tracing::debug!(id, "Entry inserted");
        Ok(id)
    }

    /// Encrypt and overwrite the entry with `entry.id`.
    pub fn update_entry(&self, entry: &DecryptedEntry) -> Result<()> {
        let stored = self.encrypt_entry(entry)?;
        self.store.update_entry(&stored)?;
        tracing::debug!(id = entry.id, "Entry updated");
        Ok(())
    }

    /// Delete an entry. Returns whether it existed.
    pub fn delete_entry(&self, id: i64) -> Result<bool> {
        self.store.delete_entry(id)
    }

    pub fn get_entry(&self, id: i64) -> Result<Option<DecryptedEntry>> {
        Ok(self
            .store
            .get_entry(id)?
            .and_then(|stored| self.decrypt_entry(stored)))
    }

    /// Every readable entry, newest-updated first.
    pub fn all_entries(&self) -> Result<Vec<DecryptedEntry>> {
        Ok(self.decrypt_entries(self.store.list_entries()?))
    }

    /// Entries whose title or content contains `query`, ignoring case.
    ///
    /// A blank query matches nothing and does not touch the store.
    pub fn search_entries(&self, query: &str) -> Result<Vec<DecryptedEntry>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        let candidates = self.decrypt_entries(self.store.search_entries(query)?);
        Ok(candidates
            .into_iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(&needle)
                    || entry.content.to_lowercase().contains(&needle)
            })
            .collect())
    }

    // --- Templates ---

    pub fn insert_template(&self, template: &DecryptedTemplate) -> Result<i64> {
        let stored = self.encrypt_template(template)?;
        let id = self.store.insert_template(&stored)?;
        tracing::debug!(id, "Template inserted");
        Ok(id)
    }

    pub fn update_template(&self, template: &DecryptedTemplate) -> Result<()> {
        let stored = self.encrypt_template(template)?;
        self.store.update_template(&stored)
    }

    pub fn delete_template(&self, id: i64) -> Result<bool> {
        self.store.delete_template(id)
    }

    pub fn get_template(&self, id: i64) -> Result<Option<DecryptedTemplate>> {
        Ok(self
            .store
            .get_template(id)?
            .and_then(|stored| self.decrypt_template(stored)))
    }

    /// Every readable template, sorted by name.
    pub fn all_templates(&self) -> Result<Vec<DecryptedTemplate>> {
        let mut templates: Vec<_> = self
            .store
            .list_templates()?
            .into_iter()
            .filter_map(|stored| self.decrypt_template(stored))
            .collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(templates)
    }

    // --- Encryption ---

    fn encrypt_entry(&self, entry: &DecryptedEntry) -> Result<StoredEntry> {
        let voice_note_path = match entry.voice_note_path.as_deref() {
            Some(path) => encrypt(path, &self.key)?,
            None => String::new(),
        };

        Ok(StoredEntry {
            id: entry.id,
            title: encrypt(&entry.title, &self.key)?,
            content: encrypt(&entry.content, &self.key)?,
            created_at: entry.created_at.timestamp_millis(),
            updated_at: entry.updated_at.timestamp_millis(),
            template_id: entry.template_id,
            tags: encrypt(&entry.tags.join(LIST_SEPARATOR), &self.key)?,
            media_paths: encrypt(&entry.media_paths.join(LIST_SEPARATOR), &self.key)?,
            voice_note_path,
        })
    }

    fn decrypt_entries(&self, stored: Vec<StoredEntry>) -> Vec<DecryptedEntry> {
        stored
            .into_iter()
            .filter_map(|entry| self.decrypt_entry(entry))
            .collect()
    }

    fn decrypt_entry(&self, stored: StoredEntry) -> Option<DecryptedEntry> {
        let (title, content) = match (
            decrypt(&stored.title, &self.key),
            decrypt(&stored.content, &self.key),
        ) {
            (Ok(title), Ok(content)) => (title, content),
            _ => {
                tracing::warn!(id = stored.id, "Skipping entry that failed authentication");
                return None;
            }
        };

        let voice_note_path = self
            .decrypt_optional(stored.id, "voice_note_path", &stored.voice_note_path)
            .filter(|path| !path.is_empty());

        Some(DecryptedEntry {
            id: stored.id,
            title,
            content,
            created_at: from_millis(stored.created_at),
            updated_at: from_millis(stored.updated_at),
            template_id: stored.template_id,
            tags: self.decrypt_list(stored.id, "tags", &stored.tags),
            media_paths: self.decrypt_list(stored.id, "media_paths", &stored.media_paths),
            voice_note_path,
        })
    }

    fn decrypt_list(&self, id: i64, field: &str, blob: &str) -> Vec<String> {
        self.decrypt_optional(id, field, blob)
            .map(|joined| {
                joined
                    .split(LIST_SEPARATOR)
                    .filter(|item| !item.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn decrypt_optional(&self, id: i64, field: &str, blob: &str) -> Option<String> {
        if blob.is_empty() {
            return None;
        }
        match decrypt(blob, &self.key) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(id, field, "Optional field failed authentication");
                None
            }
        }
    }

    fn encrypt_template(&self, template: &DecryptedTemplate) -> Result<StoredTemplate> {
        Ok(StoredTemplate {
            id: template.id,
            name: encrypt(&template.name, &self.key)?,
            content: encrypt(&template.content, &self.key)?,
        })
    }

    fn decrypt_template(&self, stored: StoredTemplate) -> Option<DecryptedTemplate> {
        match (
            decrypt(&stored.name, &self.key),
            decrypt(&stored.content, &self.key),
        ) {
            (Ok(name), Ok(content)) => Some(DecryptedTemplate {
                id: stored.id,
                name,
                content,
            }),
            _ => {
                tracing::warn!(id = stored.id, "Skipping template that failed authentication");
                None
            }
        }
    }
}

impl<S: RecordStore + ?Sized + 'static> JournalRepository<S> {
    /// Live view of all readable entries. See [`DecryptedStream`].
    pub fn entries_stream(&self) -> DecryptedStream<DecryptedEntry> {
        let repo = self.clone();
        DecryptedStream::new(self.store.subscribe_entries(), move || repo.all_entries())
    }

    /// Live view of all readable templates, sorted by name.
    pub fn templates_stream(&self) -> DecryptedStream<DecryptedTemplate> {
        let repo = self.clone();
        DecryptedStream::new(self.store.subscribe_templates(), move || {
            repo.all_templates()
        })
    }
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    fn repo() -> JournalRepository<SqliteStore> {
        JournalRepository::new(
            Arc::new(SqliteStore::in_memory().unwrap()),
            Arc::new(SymmetricKey::generate()),
        )
    }

    #[test]
    fn test_insert_get_round_trip() {
        let repo = repo();
        let entry = DecryptedEntry::new("Title", "Body")
            .with_tags(["work", "ideas"])
            .with_media_paths(["/tmp/a.enc"])
            .with_voice_note("/tmp/v.enc")
            .with_template(3);

        let id = repo.insert_entry(&entry).unwrap();
        let fetched = repo.get_entry(id).unwrap().unwrap();

        assert_eq!(fetched, DecryptedEntry { id, ..entry });
    }

    #[test]
    fn test_store_sees_only_ciphertext() {
        let repo = repo();
        let id = repo
            .insert_entry(&DecryptedEntry::new("secret title", "secret body").with_tags(["tag"]))
            .unwrap();

        let stored = repo.store().get_entry(id).unwrap().unwrap();
        assert!(!stored.title.contains("secret"));
        assert!(!stored.content.contains("secret"));
        assert!(!stored.tags.contains("tag"));
        assert!(stored.voice_note_path.is_empty());
    }

    #[test]
    fn test_other_key_cannot_read() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let writer = JournalRepository::new(Arc::clone(&store), Arc::new(SymmetricKey::generate()));
        let reader = JournalRepository::new(store, Arc::new(SymmetricKey::generate()));

        let id = writer.insert_entry(&DecryptedEntry::new("t", "c")).unwrap();
        assert!(reader.get_entry(id).unwrap().is_none());
        assert!(reader.all_entries().unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        let repo = repo();
        let id = repo.insert_entry(&DecryptedEntry::new("t", "c")).unwrap();

        let mut entry = repo.get_entry(id).unwrap().unwrap();
        entry.content = "changed".to_string();
        entry.touch();
        repo.update_entry(&entry).unwrap();
        assert_eq!(repo.get_entry(id).unwrap().unwrap().content, "changed");

        assert!(repo.delete_entry(id).unwrap());
        assert!(repo.get_entry(id).unwrap().is_none());
    }

    #[test]
    fn test_search_is_case_insensitive_on_decrypted_text() {
        let repo = repo();
        repo.insert_entry(&DecryptedEntry::new("Morning walk", "Saw a heron"))
            .unwrap();
        repo.insert_entry(&DecryptedEntry::new("Groceries", "eggs, MILK"))
            .unwrap();

        let hits = repo.search_entries("  milk ").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Groceries");

        assert_eq!(repo.search_entries("HERON").unwrap().len(), 1);
        assert!(repo.search_entries("penguin").unwrap().is_empty());
    }

    #[test]
    fn test_templates_sorted_by_name() {
        let repo = repo();
        repo.insert_template(&DecryptedTemplate::new("Zeta", "z")).unwrap();
        repo.insert_template(&DecryptedTemplate::new("Alpha", "a")).unwrap();

        let names: Vec<_> = repo
            .all_templates()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_template_update_get_delete() {
        let repo = repo();
        let id = repo
            .insert_template(&DecryptedTemplate::new("Daily", "## Mood"))
            .unwrap();

        let mut template = repo.get_template(id).unwrap().unwrap();
        template.content = "## Energy".to_string();
        repo.update_template(&template).unwrap();

        assert_eq!(repo.get_template(id).unwrap().unwrap(), template);
        assert!(repo.delete_template(id).unwrap());
        assert!(repo.get_template(id).unwrap().is_none());
    }

    #[test]
    fn test_list_fields_keep_stored_items_verbatim() {
        let repo = repo();
        let id = repo
            .insert_entry(&DecryptedEntry::new("t", "c").with_tags([" padded ", "plain", "  "]))
            .unwrap();

        let entry = repo.get_entry(id).unwrap().unwrap();
        assert_eq!(entry.tags, vec![" padded ", "plain"]);
    }

    #[tokio::test]
    async fn test_entries_stream_emits_snapshot_then_changes() {
        let repo = repo();
        repo.insert_entry(&DecryptedEntry::new("one", "1")).unwrap();

        let mut stream = repo.entries_stream();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);

        repo.insert_entry(&DecryptedEntry::new("two", "2")).unwrap();
        repo.insert_entry(&DecryptedEntry::new("three", "3")).unwrap();

        let latest = stream.next().await.unwrap().unwrap();
        assert_eq!(latest.len(), 3);
    }
}
