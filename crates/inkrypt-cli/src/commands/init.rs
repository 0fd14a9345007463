use inkrypt_core::{AuthState, InkryptError, SqliteStore};

use crate::app::{prompt_new_pin, resolve_config_path, AppContext};
use crate::config::{write_config, InkryptConfig};
use crate::errors::CliError;

pub fn handle_init(ctx: &AppContext) -> anyhow::Result<()> {
    let paths = ctx.paths()?;
    let mut session = ctx.session()?;

    if !matches!(session.state(), AuthState::SetupRequired) {
        return Err(CliError::invalid_input(format!(
            "A PIN is already set up ({}).\nHint: Run `inkrypt reset` to erase it and start over.",
            paths.settings.display()
        ))
        .into());
    }
    if paths.journal.exists() {
        return Err(CliError::invalid_input(format!(
            "A journal already exists at {} without a PIN to open it.\nHint: Run `inkrypt reset` to remove it.",
            paths.journal.display()
        ))
        .into());
    }

    let pin = prompt_new_pin(ctx.interactive())?;
    let key = match session.setup_pin(&pin) {
        Ok(key) => key,
        Err(InkryptError::InvalidInput(message)) => {
            return Err(CliError::invalid_input(message).into())
        }
        Err(err) => return Err(err.into()),
    };

    if let Err(err) = SqliteStore::create(&paths.journal, &key.store_passphrase()) {
        // Without a store the PIN would lock nothing; undo the setup.
        if let Err(reset_err) = session.reset_app(|| Ok(())) {
            tracing::warn!(error = %reset_err, "Failed to roll back PIN setup");
        }
        return Err(err.into());
    }

    let config_path = resolve_config_path()?;
    if !config_path.exists() {
        write_config(&config_path, &InkryptConfig::for_journal(&paths.journal))?;
    }

    if !ctx.quiet() {
        println!("Initialized new journal at {}", paths.journal.display());
    }
    Ok(())
}

pub fn handle_unlock(ctx: &AppContext) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let entries = journal.repo().all_entries()?;
    let templates = journal.repo().all_templates()?;

    if !ctx.quiet() {
        println!("Unlocked journal at {}", journal.path().display());
        println!(
            "{} entr{}, {} template{}",
            entries.len(),
            if entries.len() == 1 { "y" } else { "ies" },
            templates.len(),
            if templates.len() == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
