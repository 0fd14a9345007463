use std::path::Path;

use inkrypt_core::media::MediaVault;

use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::output::{print_entry, print_json};

use super::require_entry;

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let entry = require_entry(journal.repo(), args.id)?;

    if let Some(dir) = &args.extract_media {
        let vault = journal.media();
        let written = extract_media(
            &vault,
            entry.media_paths.iter().chain(entry.voice_note_path.iter()),
            dir,
        )?;
        if !ctx.quiet() {
            eprintln!("Extracted {} attachment(s) to {}", written, dir.display());
        }
    }

    if args.json {
        print_json(&entry)
    } else {
        print_entry(&entry, ctx.quiet());
        Ok(())
    }
}

/// Decrypt each attachment into `dir`, named after its vault file.
///
/// Attachments that are missing or fail authentication are skipped.
fn extract_media<'a>(
    vault: &MediaVault,
    paths: impl Iterator<Item = &'a String>,
    dir: &Path,
) -> anyhow::Result<usize> {
    std::fs::create_dir_all(dir)?;
    let mut written = 0;
    for path in paths {
        let source = Path::new(path);
        let Some(bytes) = vault.load(source)? else {
            tracing::warn!(path = %source.display(), "Attachment unavailable");
            continue;
        };
        let name = source
            .file_stem()
            .map(|stem| stem.to_os_string())
            .unwrap_or_else(|| format!("attachment_{}", written).into());
        std::fs::write(dir.join(name), bytes)?;
        written += 1;
    }
    Ok(written)
}
