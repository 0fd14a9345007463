//! Record shapes as the store sees them.
//!
//! Sensitive fields hold encrypted blobs; the store never sees their plaintext.
//! Ids, timestamps and the template link stay in the clear.

use serde::{Deserialize, Serialize};

/// A journal entry row.
///
/// `id` is assigned by the store and ignored on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: i64,

    /// Encrypted title.
    pub title: String,

    /// Encrypted body.
    pub content: String,

    /// Epoch milliseconds.
    pub created_at: i64,

    /// Epoch milliseconds.
    pub updated_at: i64,

    pub template_id: Option<i64>,

    /// Encrypted comma-joined tags.
    pub tags: String,

    /// Encrypted comma-joined media file paths.
    pub media_paths: String,

    /// Encrypted voice note path, or empty for none.
    pub voice_note_path: String,
}

/// A template row. Both name and content are encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub id: i64,
    pub name: String,
    pub content: String,
}
