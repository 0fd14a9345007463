use crate::app::AppContext;
use crate::cli::TemplateListArgs;
use crate::output::{print_json, print_template_list};

pub fn handle_list(ctx: &AppContext, args: &TemplateListArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let templates = journal.repo().all_templates()?;

    if args.json {
        print_json(&templates)
    } else {
        print_template_list(&templates, ctx.quiet());
        Ok(())
    }
}
