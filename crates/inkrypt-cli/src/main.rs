//! Inkrypt CLI - a PIN-locked journal whose entries are encrypted at rest
//!
//! This is the command-line interface for Inkrypt. It wires the core
//! library's session, repository and export codec to terminal commands.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;

use clap::Parser;
use inkrypt_core::VERSION;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands, ExportSubcommand, ImportSubcommand, TemplateSubcommand};
use crate::commands::{entries, init, maintenance, misc, templates, transfer};
use crate::constants::LOG_ENV;

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(err) = run(&ctx, &cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(errors::exit_code_for(&err));
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init) => init::handle_init(ctx),
        Some(Commands::Unlock) => init::handle_unlock(ctx),
        Some(Commands::Add(args)) => entries::handle_add(ctx, args),
        Some(Commands::Edit(args)) => entries::handle_edit(ctx, args),
        Some(Commands::Delete(args)) => entries::handle_delete(ctx, args),
        Some(Commands::List(args)) => entries::handle_list(ctx, args),
        Some(Commands::Show(args)) => entries::handle_show(ctx, args),
        Some(Commands::Search(args)) => entries::handle_search(ctx, args),
        Some(Commands::Template(sub)) => match sub {
            TemplateSubcommand::Add(args) => templates::handle_add(ctx, args),
            TemplateSubcommand::List(args) => templates::handle_list(ctx, args),
            TemplateSubcommand::Show(args) => templates::handle_show(ctx, args),
            TemplateSubcommand::Delete(args) => templates::handle_delete(ctx, args),
        },
        Some(Commands::Export(sub)) => match sub {
            ExportSubcommand::Markdown(args) => transfer::handle_export_markdown(ctx, args),
            ExportSubcommand::Archive(args) => transfer::handle_export_archive(ctx, args),
        },
        Some(Commands::Import(sub)) => match sub {
            ImportSubcommand::Markdown(args) => transfer::handle_import_markdown(ctx, args),
            ImportSubcommand::Archive(args) => transfer::handle_import_archive(ctx, args),
        },
        Some(Commands::Reset(args)) => maintenance::handle_reset(ctx, args),
        Some(Commands::Completions(args)) => misc::handle_completions(args.shell),
        None => {
            println!("Inkrypt v{}", VERSION);
            println!("\nRun `inkrypt --help` for usage information.");
            Ok(())
        }
    }
}
