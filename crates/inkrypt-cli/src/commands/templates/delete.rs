use crate::app::AppContext;
use crate::cli::IdArgs;

use super::require_template;

pub fn handle_delete(ctx: &AppContext, args: &IdArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let template = require_template(journal.repo(), args.id)?;

    journal.repo().delete_template(template.id)?;
    journal.save()?;

    if !ctx.quiet() {
        println!("Deleted template '{}'", template.name);
    }
    Ok(())
}
