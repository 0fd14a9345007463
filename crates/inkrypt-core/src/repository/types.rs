//! Plaintext domain records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A journal entry with every field in the clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedEntry {
    /// Store-assigned id; `0` until inserted.
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub template_id: Option<i64>,
    pub tags: Vec<String>,
    pub media_paths: Vec<String>,
    pub voice_note_path: Option<String>,
}

impl DecryptedEntry {
    /// A new, not yet stored entry stamped with the current time.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: 0,
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            template_id: None,
            tags: Vec::new(),
            media_paths: Vec::new(),
            voice_note_path: None,
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_media_paths<I, T>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.media_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_voice_note(mut self, path: impl Into<String>) -> Self {
        self.voice_note_path = Some(path.into());
        self
    }

    pub fn with_template(mut self, template_id: i64) -> Self {
        self.template_id = Some(template_id);
        self
    }

    /// Bump `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}

/// Current time at the millisecond precision the store keeps.
pub(crate) fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// A reusable entry body with a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedTemplate {
    pub id: i64,
    pub name: String,
    pub content: String,
}

impl DecryptedTemplate {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            content: content.into(),
        }
    }
}
