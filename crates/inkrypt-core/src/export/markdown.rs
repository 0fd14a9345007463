//! Markdown renderings of the journal.
//!
//! Two independent layouts:
//!
//! - [`CombinedMarkdown`]: every entry in one document, sections separated
//!   by `---`. Used for plain `.md` exports.
//! - [`EntryMarkdown`]: one document per entry, named `entry_<id>.md`. Used
//!   inside encrypted archives.

use chrono::{DateTime, Local, Utc};

use super::{BundleDocument, BundleFormat, ParsedEntry};
use crate::repository::DecryptedEntry;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SECTION_SEPARATOR: &str = "---";

/// Render a timestamp as local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(DATE_FORMAT).to_string()
}

/// All entries in a single document.
///
/// ```text
/// # Inkrypt Export
///
/// Exported: 2024-05-01 09:30:00
///
/// ---
///
/// ## <title>
///
/// **Created:** <date>
/// **Updated:** <date>
///
/// <content>
///
/// ---
///
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CombinedMarkdown;

impl CombinedMarkdown {
    pub const DOCUMENT_NAME: &'static str = "inkrypt_export.md";
}

impl BundleFormat for CombinedMarkdown {
    fn encode(&self, entries: &[DecryptedEntry], exported_at: DateTime<Utc>) -> Vec<BundleDocument> {
        let mut text = format!(
            "# Inkrypt Export\n\nExported: {}\n\n{}\n\n",
            format_date(exported_at),
            SECTION_SEPARATOR
        );
        for entry in entries {
            text.push_str(&format!(
                "## {}\n\n**Created:** {}\n**Updated:** {}\n\n{}\n\n{}\n\n",
                entry.title,
                format_date(entry.created_at),
                format_date(entry.updated_at),
                entry.content,
                SECTION_SEPARATOR
            ));
        }

        vec![BundleDocument {
            name: Self::DOCUMENT_NAME.to_string(),
            text,
        }]
    }

    /// Split on `---`; keep sections whose first non-empty line is a `##`
    /// heading and that have both a title and a body.
    fn decode(&self, text: &str) -> Vec<ParsedEntry> {
        text.split(SECTION_SEPARATOR)
            .filter_map(parse_section)
            .collect()
    }
}

fn parse_section(section: &str) -> Option<ParsedEntry> {
    let mut lines = section.lines().skip_while(|line| line.trim().is_empty());
    let heading = lines.next()?;
    let title = heading.strip_prefix("##")?.trim();

    let content = lines
        .skip_while(|line| line.trim().is_empty() || line.starts_with("**"))
        .collect::<Vec<_>>()
        .join("\n");
    let content = content.trim();

    if title.is_empty() || content.is_empty() {
        return None;
    }
    Some(ParsedEntry {
        title: title.to_string(),
        content: content.to_string(),
    })
}

/// One document per entry.
///
/// ```text
/// # <title>
///
/// Created: <date>
/// Updated: <date>
///
/// <content>
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryMarkdown;

impl EntryMarkdown {
    pub fn document_name(entry: &DecryptedEntry) -> String {
        format!("entry_{}.md", entry.id)
    }
}

impl BundleFormat for EntryMarkdown {
    fn encode(&self, entries: &[DecryptedEntry], _exported_at: DateTime<Utc>) -> Vec<BundleDocument> {
        entries
            .iter()
            .map(|entry| BundleDocument {
                name: Self::document_name(entry),
                text: format!(
                    "# {}\n\nCreated: {}\nUpdated: {}\n\n{}",
                    entry.title,
                    format_date(entry.created_at),
                    format_date(entry.updated_at),
                    entry.content
                ),
            })
            .collect()
    }

    /// Title is the first line minus `# `. Content is everything after the
    /// leading run of blank, `#`, `Created:` and `Updated:` lines. An empty
    /// document yields nothing; an empty body is kept.
    fn decode(&self, text: &str) -> Vec<ParsedEntry> {
        let lines: Vec<&str> = text.lines().collect();
        let Some(first) = lines.first().copied() else {
            return Vec::new();
        };

        let title = first.strip_prefix("# ").unwrap_or(first).trim().to_string();
        let content = lines
            .iter()
            .skip_while(|line| {
                line.trim().is_empty()
                    || line.starts_with('#')
                    || line.starts_with("Created:")
                    || line.starts_with("Updated:")
            })
            .copied()
            .collect::<Vec<_>>()
            .join("\n");

        vec![ParsedEntry { title, content }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, title: &str, content: &str) -> DecryptedEntry {
        DecryptedEntry {
            id,
            ..DecryptedEntry::new(title, content)
        }
    }

    #[test]
    fn test_combined_layout() {
        let at = Utc::now();
        let docs = CombinedMarkdown.encode(&[entry(1, "Title", "Body")], at);
        assert_eq!(docs.len(), 1);

        let date = format_date(at);
        let expected_header = format!("# Inkrypt Export\n\nExported: {}\n\n---\n\n", date);
        assert!(docs[0].text.starts_with(&expected_header));
        assert!(docs[0].text.contains("## Title\n\n**Created:** "));
        assert!(docs[0].text.ends_with("\n\nBody\n\n---\n\n"));
    }

    #[test]
    fn test_combined_decode() {
        let text = "# Inkrypt Export\n\nExported: 2024-01-01 00:00:00\n\n---\n\n\
                    ## First\n\n**Created:** x\n**Updated:** y\n\nHello\nworld\n\n---\n\n\
                    ## Second\n\n**Created:** x\n**Updated:** y\n\nBye\n\n---\n\n";
        let parsed = CombinedMarkdown.decode(text);
        assert_eq!(
            parsed,
            vec![
                ParsedEntry {
                    title: "First".into(),
                    content: "Hello\nworld".into()
                },
                ParsedEntry {
                    title: "Second".into(),
                    content: "Bye".into()
                },
            ]
        );
    }

    #[test]
    fn test_combined_decode_skips_incomplete_sections() {
        let text = "## No body\n\n**Created:** x\n\n---\n\n##   \n\nbody without title\n\n---\n\nJust prose";
        assert!(CombinedMarkdown.decode(text).is_empty());
    }

    #[test]
    fn test_combined_round_trip() {
        let entries = [entry(1, "One", "first body"), entry(2, "Two", "second\nbody")];
        let docs = CombinedMarkdown.encode(&entries, Utc::now());
        let parsed = CombinedMarkdown.decode(&docs[0].text);

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].title, "Two");
        assert_eq!(parsed[1].content, "second\nbody");
    }

    #[test]
    fn test_entry_layout_and_names() {
        let docs = EntryMarkdown.encode(&[entry(7, "T", "C"), entry(9, "U", "D")], Utc::now());
        assert_eq!(docs[0].name, "entry_7.md");
        assert_eq!(docs[1].name, "entry_9.md");
        assert!(docs[0].text.starts_with("# T\n\nCreated: "));
        assert!(docs[0].text.ends_with("\n\nC"));
        assert!(!docs[0].text.ends_with('\n'));
    }

    #[test]
    fn test_entry_decode() {
        let text = "# My title \n\nCreated: 2024-01-01 00:00:00\nUpdated: 2024-01-02 00:00:00\n\nLine one\n\nLine three";
        let parsed = EntryMarkdown.decode(text);
        assert_eq!(
            parsed,
            vec![ParsedEntry {
                title: "My title".into(),
                content: "Line one\n\nLine three".into()
            }]
        );
    }

    #[test]
    fn test_entry_decode_keeps_empty_body() {
        let parsed = EntryMarkdown.decode("# Only a title\n\nCreated: x\nUpdated: y\n\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "Only a title");
        assert_eq!(parsed[0].content, "");
    }

    #[test]
    fn test_entry_decode_empty_document() {
        assert!(EntryMarkdown.decode("").is_empty());
    }
}
