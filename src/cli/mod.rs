//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - fetch: ingestion arguments (also accepted without a subcommand)
//! - validate: Validate command arguments
//! - list: List command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod fetch;
pub mod list;
pub mod validate;

pub use completions::CompletionsArgs;
pub use fetch::FetchArgs;
pub use list::ListArgs;
pub use validate::ValidateArgs;

use crate::config::DEFAULT_CONFIG_FILE;

/// skill-ingest - external skill ingestion
///
/// Fetch skills from GitHub into a skills vault and keep its marketplace
/// manifest in sync.
#[derive(Parser, Debug)]
#[command(
    name = "skill-ingest",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Fetch external skills into a skills vault",
    long_about = "Fetches the skills listed in a Source Config from GitHub (or local mirrors), \
                  extracts the configured folder, validates each SKILL.md, and merges a record \
                  per skill into .claude-plugin/marketplace.json.",
    args_conflicts_with_subcommands = true,
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  skill-ingest --all\n    \
                  skill-ingest --skill markdown-to-epub-converter\n    \
                  skill-ingest --all --dry-run\n    \
                  skill-ingest validate\n    \
                  skill-ingest list --category document-processing"
)]
pub struct Cli {
    /// Debug logging
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only warnings and errors; no progress bar
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Fetch options when no subcommand is given
    #[command(flatten)]
    pub fetch: FetchArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch configured skills (the default action)
    #[command(after_help = "EXAMPLES:\n  \
                  Fetch every configured skill:\n    skill-ingest fetch --all\n\n\
                  Fetch one skill:\n    skill-ingest fetch --skill markdown-to-epub-converter\n\n\
                  Preview without writing anything:\n    skill-ingest fetch --all --dry-run\n\n\
                  Re-fetch even when nothing changed:\n    skill-ingest fetch --all --force")]
    Fetch(FetchArgs),

    /// Validate every skill in the vault
    Validate(ValidateArgs),

    /// List skills registered in the marketplace
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Location of the Source Config
#[derive(Args, Debug, Clone)]
pub struct ConfigArg {
    /// Source Config file
    #[arg(
        long,
        short = 'c',
        env = "SKILL_INGEST_CONFIG",
        default_value = DEFAULT_CONFIG_FILE,
        value_name = "PATH"
    )]
    pub config: PathBuf,
}
