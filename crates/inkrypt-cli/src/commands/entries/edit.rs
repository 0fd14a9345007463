use crate::app::AppContext;
use crate::cli::EditArgs;
use crate::errors::CliError;

use super::require_entry;

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    if args.title.is_none() && args.body.is_none() && args.tag.is_empty() && !args.clear_tags {
        return Err(CliError::invalid_input(
            "Nothing to change; pass --title, --body, --tag or --clear-tags",
        )
        .into());
    }

    let journal = ctx.open_journal()?;
    let mut entry = require_entry(journal.repo(), args.id)?;

    if let Some(title) = &args.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(CliError::invalid_input("Entry title cannot be empty").into());
        }
        entry.title = title.to_string();
    }
    if let Some(body) = &args.body {
        entry.content = body.clone();
    }
    if args.clear_tags {
        entry.tags.clear();
    } else if !args.tag.is_empty() {
        entry.tags = args.tag.clone();
    }
    entry.touch();

    journal.repo().update_entry(&entry)?;
    journal.save()?;

    if !ctx.quiet() {
        println!("Updated entry {}", entry.id);
    }
    Ok(())
}
