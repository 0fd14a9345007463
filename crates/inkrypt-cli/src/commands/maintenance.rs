use inkrypt_core::SqliteStore;

use crate::app::{confirm, AppContext};
use crate::cli::ResetArgs;
use crate::errors::CliError;

/// Erase the PIN, the journal store and the media vault.
///
/// No PIN is asked for: a forgotten PIN is exactly when this is needed.
pub fn handle_reset(ctx: &AppContext, args: &ResetArgs) -> anyhow::Result<()> {
    let paths = ctx.paths()?;

    if !args.yes {
        let question = format!(
            "Erase the journal at {} and its PIN? This cannot be undone",
            paths.journal.display()
        );
        if !confirm(ctx.interactive(), &question)? {
            if !ctx.interactive() {
                return Err(CliError::invalid_input(
                    "Refusing to reset without confirmation; pass --yes",
                )
                .into());
            }
            if !ctx.quiet() {
                println!("Cancelled");
            }
            return Ok(());
        }
    }

    let mut session = ctx.session()?;
    session.reset_app(|| {
        SqliteStore::destroy(&paths.journal)?;
        match std::fs::remove_dir_all(&paths.media_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    })?;

    if !ctx.quiet() {
        println!("Reset complete. Run `inkrypt init` to start a new journal.");
    }
    Ok(())
}
