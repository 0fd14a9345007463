use crate::app::AppContext;
use crate::cli::IdArgs;

use super::require_template;

pub fn handle_show(ctx: &AppContext, args: &IdArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let template = require_template(journal.repo(), args.id)?;

    if !ctx.quiet() {
        println!("ID: {}", template.id);
        println!("Name: {}", template.name);
        println!();
    }
    println!("{}", template.content);
    Ok(())
}
