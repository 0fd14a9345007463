use inkrypt_core::DecryptedTemplate;

use crate::app::{read_body, AppContext};
use crate::cli::TemplateAddArgs;
use crate::errors::CliError;

pub fn handle_add(ctx: &AppContext, args: &TemplateAddArgs) -> anyhow::Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(CliError::invalid_input("Template name cannot be empty").into());
    }

    let journal = ctx.open_journal()?;
    let content = read_body(ctx.no_input(), args.body.as_deref())?;
    let id = journal
        .repo()
        .insert_template(&DecryptedTemplate::new(name, content))?;
    journal.save()?;

    if !ctx.quiet() {
        println!("Added template {} ({})", id, name);
    }
    Ok(())
}
