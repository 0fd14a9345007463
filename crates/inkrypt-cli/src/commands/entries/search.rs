use crate::app::AppContext;
use crate::cli::SearchArgs;
use crate::output::{print_entry_list, print_json};

pub fn handle_search(ctx: &AppContext, args: &SearchArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let mut entries = journal.repo().search_entries(&args.query)?;
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
