use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::output::{print_entry_list, print_json};

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let mut entries = journal.repo().all_entries()?;

    if let Some(tag) = &args.tag {
        entries.retain(|entry| entry.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)));
    }
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    if args.json {
        print_json(&entries)
    } else {
        print_entry_list(&entries, ctx.quiet());
        Ok(())
    }
}
