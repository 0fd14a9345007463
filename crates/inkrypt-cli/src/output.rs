//! Output formatting helpers for the CLI.

use chrono::{DateTime, Local, Utc};
use inkrypt_core::{DecryptedEntry, DecryptedTemplate};

const SUMMARY_WIDTH: usize = 60;

/// Local wall-clock rendering of a stored timestamp.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// First line of the body, shortened for list views.
pub fn entry_summary(entry: &DecryptedEntry) -> String {
    let first = entry.content.lines().next().unwrap_or_default();
    truncate(first, SUMMARY_WIDTH)
}

/// Print entries as a table of id, update time, title and summary.
pub fn print_entry_list(entries: &[DecryptedEntry], quiet: bool) {
    if !quiet {
        println!("ID | UPDATED | TITLE | SUMMARY");
    }
    for entry in entries {
        println!(
            "{} | {} | {} | {}",
            entry.id,
            format_timestamp(&entry.updated_at),
            entry.title,
            entry_summary(entry)
        );
    }
}

/// Print a single entry in human-readable format.
pub fn print_entry(entry: &DecryptedEntry, quiet: bool) {
    if !quiet {
        println!("ID: {}", entry.id);
        println!("Title: {}", entry.title);
        println!("Created: {}", format_timestamp(&entry.created_at));
        println!("Updated: {}", format_timestamp(&entry.updated_at));
        if let Some(template_id) = entry.template_id {
            println!("Template: {}", template_id);
        }
        if !entry.tags.is_empty() {
            println!("Tags: {}", entry.tags.join(", "));
        }
        if !entry.media_paths.is_empty() {
            println!("Images: {}", entry.media_paths.len());
        }
        if entry.voice_note_path.is_some() {
            println!("Voice note: yes");
        }
        println!();
    }
    println!("{}", entry.content);
}

pub fn print_template_list(templates: &[DecryptedTemplate], quiet: bool) {
    if !quiet {
        println!("ID | NAME");
    }
    for template in templates {
        println!("{} | {}", template.id, template.name);
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer line", 8), "a lon...");
        assert_eq!(truncate("abcdef", 3), "abc");
    }

    #[test]
    fn test_summary_uses_first_line() {
        let entry = DecryptedEntry::new("t", "first line\nsecond line");
        assert_eq!(entry_summary(&entry), "first line");

        let empty = DecryptedEntry::new("t", "");
        assert_eq!(entry_summary(&empty), "");
    }
}
