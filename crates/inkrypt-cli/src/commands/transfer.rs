//! Export and import in the markdown and encrypted-archive formats.

use std::path::{Path, PathBuf};

use inkrypt_core::ImportOutcome;

use crate::app::{prompt_archive_password, AppContext};
use crate::cli::{ExportArgs, ImportArgs};
use crate::errors::CliError;

pub fn handle_export_markdown(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let exporter = journal.exporter();

    let written = match &args.output {
        Some(dest) => {
            exporter.export_to_markdown_to(dest)?;
            dest.clone()
        }
        None => exporter.export_to_markdown()?,
    };
    report_export(ctx, &written);
    Ok(())
}

pub fn handle_export_archive(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let exporter = journal.exporter();
    let password = prompt_archive_password(ctx.interactive(), true)?;

    let written: PathBuf = match &args.output {
        Some(dest) => {
            exporter.export_to_encrypted_archive_to(&password, dest)?;
            dest.clone()
        }
        None => exporter.export_to_encrypted_archive(&password)?,
    };
    report_export(ctx, &written);
    Ok(())
}

pub fn handle_import_markdown(ctx: &AppContext, args: &ImportArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    let outcome = journal.exporter().import_from_markdown(&args.path)?;
    finish_import(ctx, outcome, &args.path)?;
    journal.save()
}

pub fn handle_import_archive(ctx: &AppContext, args: &ImportArgs) -> anyhow::Result<()> {
    let journal = ctx.open_journal()?;
    if !args.path.exists() {
        return finish_import(ctx, ImportOutcome::SourceUnavailable, &args.path);
    }
    let password = prompt_archive_password(ctx.interactive(), false)?;
    let outcome = journal
        .exporter()
        .import_from_encrypted_archive(&args.path, &password)?;
    finish_import(ctx, outcome, &args.path)?;
    journal.save()
}

fn report_export(ctx: &AppContext, written: &Path) {
    if ctx.quiet() {
        println!("{}", written.display());
    } else {
        println!("Exported journal to {}", written.display());
    }
}

fn finish_import(ctx: &AppContext, outcome: ImportOutcome, source: &Path) -> anyhow::Result<()> {
    match outcome {
        ImportOutcome::Imported(count) => {
            if !ctx.quiet() {
                println!(
                    "Imported {} entr{} from {}",
                    count,
                    if count == 1 { "y" } else { "ies" },
                    source.display()
                );
            }
            Ok(())
        }
        ImportOutcome::PasswordRejected => Err(CliError::import_rejected(format!(
            "Could not open {}: wrong password or damaged archive",
            source.display()
        ))
        .into()),
        ImportOutcome::SourceUnavailable => Err(CliError::not_found(
            format!("Cannot read {}", source.display()),
            "Hint: Check the path to the export file.",
        )
        .into()),
    }
}
