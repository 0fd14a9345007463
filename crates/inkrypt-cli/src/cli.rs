use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use inkrypt_core::VERSION;

/// Inkrypt - a PIN-locked journal whose entries are encrypted at rest
#[derive(Parser)]
#[command(name = "inkrypt")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the encrypted journal store
    #[arg(short, long, global = true, env = "INKRYPT_JOURNAL")]
    pub journal: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_input: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Entry title
    #[arg(value_name = "TITLE")]
    pub title: String,

    /// Entry body (overrides template, stdin and editor)
    #[arg(long)]
    pub body: Option<String>,

    /// Start from a template's body
    #[arg(long, value_name = "TEMPLATE_ID")]
    pub template: Option<i64>,

    /// Add tags to the entry
    #[arg(short, long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Attach an image file (encrypted into the media vault)
    #[arg(long, value_name = "FILE")]
    pub image: Vec<PathBuf>,

    /// Attach a voice note (encrypted into the media vault)
    #[arg(long, value_name = "FILE")]
    pub voice: Option<PathBuf>,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Entry ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New body
    #[arg(long)]
    pub body: Option<String>,

    /// Replace the entry's tags
    #[arg(short, long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Remove every tag
    #[arg(long, conflicts_with = "tag")]
    pub clear_tags: bool,
}

/// Arguments for commands addressing one record by ID
#[derive(Args)]
pub struct IdArgs {
    /// Record ID
    #[arg(value_name = "ID")]
    pub id: i64,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `search` command
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in titles and bodies (case-insensitive)
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Entry ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Decrypt the entry's attachments into this directory
    #[arg(long, value_name = "DIR")]
    pub extract_media: Option<PathBuf>,
}

/// Arguments for the `template add` command
#[derive(Args)]
pub struct TemplateAddArgs {
    /// Template name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Template body (overrides stdin and editor)
    #[arg(long)]
    pub body: Option<String>,
}

/// Arguments for the `template list` command
#[derive(Args)]
pub struct TemplateListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for export commands
#[derive(Args)]
pub struct ExportArgs {
    /// Destination file (defaults to a timestamped name in the export directory)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for import commands
#[derive(Args)]
pub struct ImportArgs {
    /// File to import
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// Arguments for the `reset` command
#[derive(Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum TemplateSubcommand {
    /// Create a template
    Add(TemplateAddArgs),

    /// List templates by name
    List(TemplateListArgs),

    /// Show a template's body
    Show(IdArgs),

    /// Delete a template
    Delete(IdArgs),
}

#[derive(Subcommand)]
pub enum ExportSubcommand {
    /// Export every entry to a single markdown document
    Markdown(ExportArgs),

    /// Export every entry to a password-protected zip archive
    Archive(ExportArgs),
}

#[derive(Subcommand)]
pub enum ImportSubcommand {
    /// Import entries from a combined markdown export
    Markdown(ImportArgs),

    /// Import entries from a password-protected zip archive
    Archive(ImportArgs),
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up a PIN and create a new encrypted journal
    Init,

    /// Verify the PIN and check that the journal opens
    Unlock,

    /// Add a new entry
    Add(AddArgs),

    /// Edit an existing entry
    Edit(EditArgs),

    /// Delete an entry and its attachments
    Delete(IdArgs),

    /// List entries, most recently updated first
    List(ListArgs),

    /// Show a specific entry by ID
    Show(ShowArgs),

    /// Search entry titles and bodies
    Search(SearchArgs),

    /// Manage entry templates
    #[command(subcommand)]
    Template(TemplateSubcommand),

    /// Export entries (you own your data)
    #[command(subcommand)]
    Export(ExportSubcommand),

    /// Import entries from an export
    #[command(subcommand)]
    Import(ImportSubcommand),

    /// Erase the PIN, the journal and its attachments
    Reset(ResetArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
