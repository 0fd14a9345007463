use std::path::Path;

use crate::app::AppContext;
use crate::cli::IdArgs;

use super::require_entry;

pub fn handle_delete(ctx: &AppContext, args: &IdArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let entry = require_entry(journal.repo(), args.id)?;

    journal.repo().delete_entry(entry.id)?;
    journal.save()?;

    // Attachments go after the store no longer references them.
    let vault = journal.media();
    for path in entry.media_paths.iter().chain(entry.voice_note_path.iter()) {
        vault.delete(Path::new(path));
    }

    if !ctx.quiet() {
        println!("Deleted entry {}", entry.id);
    }
    Ok(())
}
