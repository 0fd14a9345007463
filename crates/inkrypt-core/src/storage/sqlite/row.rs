//! Row mapping for the journal tables.

use rusqlite::Row;

use crate::storage::types::{StoredEntry, StoredTemplate};

pub(super) const ENTRY_COLUMNS: &str =
    "id, title, content, created_at, updated_at, template_id, tags, media_paths, voice_note_path";

pub(super) const TEMPLATE_COLUMNS: &str = "id, name, content";

pub(super) fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<StoredEntry> {
    Ok(StoredEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        template_id: row.get(5)?,
        tags: row.get(6)?,
        media_paths: row.get(7)?,
        voice_note_path: row.get(8)?,
    })
}

pub(super) fn template_from_row(row: &Row<'_>) -> rusqlite::Result<StoredTemplate> {
    Ok(StoredTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        content: row.get(2)?,
    })
}
