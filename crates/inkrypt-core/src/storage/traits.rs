//! Record store trait definition.
//!
//! The `RecordStore` trait is the persistent keyed store underneath the
//! journal repository. It deals only in [`StoredEntry`] and
//! [`StoredTemplate`] rows whose sensitive fields are already encrypted.

use tokio::sync::watch;

use super::types::{StoredEntry, StoredTemplate};
use crate::error::Result;

/// Change notifications for one collection.
///
/// The value is a version counter bumped on every committed write. Only the
/// latest version is retained, so bursts of writes may be observed as one.
pub type ChangeFeed = watch::Receiver<u64>;

/// Persistent keyed store for journal records.
///
/// All implementations must ensure:
/// - Each single-record write is atomic
/// - Every committed write bumps the matching [`ChangeFeed`]
/// - Entries are listed newest-updated first
pub trait RecordStore: Send + Sync {
    // --- Entry operations ---

    /// Insert a new entry, returning its store-assigned id.
    fn insert_entry(&self, entry: &StoredEntry) -> Result<i64>;

    /// Replace the entry with `entry.id`.
    ///
    /// # Errors
    ///
    /// Returns `InkryptError::NotFound` if no entry has that id.
    fn update_entry(&self, entry: &StoredEntry) -> Result<()>;

    /// Delete an entry. Returns whether a row was removed.
    fn delete_entry(&self, id: i64) -> Result<bool>;

    /// Get an entry by id.
    ///
    /// Returns `Ok(None)` if not found.
    fn get_entry(&self, id: i64) -> Result<Option<StoredEntry>>;

    /// List all entries, newest-updated first.
    fn list_entries(&self) -> Result<Vec<StoredEntry>>;

    /// Candidate entries for a search.
    ///
    /// The store cannot read encrypted fields, so the caller makes the final
    /// match on decrypted text. A store may return every entry; it must never
    /// omit one that could match.
    fn search_entries(&self, query: &str) -> Result<Vec<StoredEntry>>;

    /// Subscribe to entry changes.
    fn subscribe_entries(&self) -> ChangeFeed;

    // --- Template operations ---

    /// Insert a new template, returning its store-assigned id.
    fn insert_template(&self, template: &StoredTemplate) -> Result<i64>;

    /// Replace the template with `template.id`.
    ///
    /// # Errors
    ///
    /// Returns `InkryptError::NotFound` if no template has that id.
    fn update_template(&self, template: &StoredTemplate) -> Result<()>;

    /// Delete a template. Returns whether a row was removed.
    fn delete_template(&self, id: i64) -> Result<bool>;

    fn get_template(&self, id: i64) -> Result<Option<StoredTemplate>>;

    fn list_templates(&self) -> Result<Vec<StoredTemplate>>;

    fn subscribe_templates(&self) -> ChangeFeed;

    // --- Maintenance operations ---

    /// Remove every entry and template.
    fn clear_all(&self) -> Result<()>;
}
