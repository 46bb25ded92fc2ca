//! skill-ingest - external skill ingestion
//!
//! Fetches skills listed in a Source Config from GitHub (or local mirrors),
//! extracts the configured folder into a skills vault, validates each
//! `SKILL.md` and keeps `.claude-plugin/marketplace.json` in sync.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod common;
mod config;
mod error;
mod extract;
mod fetch;
mod git;
mod hash;
mod path_utils;
mod pipeline;
mod registry;
mod report;
mod source;
mod temp;
mod transaction;
mod ui;
mod validate;

use cli::{Cli, Commands};
use error::IngestError;

/// Environment variable holding a tracing filter, e.g. `skill_ingest=trace`
const LOG_ENV: &str = "SKILL_INGEST_LOG";

fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "skill_ingest=debug"
    } else if quiet {
        "warn"
    } else {
        "skill_ingest=info"
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(e: &IngestError) {
    eprintln!("Error: {}", e);
    if let Some(help) = e.help() {
        eprintln!("  help: {}", help);
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        None => commands::fetch::run(cli.fetch, cli.quiet),
        Some(Commands::Fetch(args)) => commands::fetch::run(args, cli.quiet),
        Some(Commands::Validate(args)) => commands::validate::run(args),
        Some(Commands::List(args)) => commands::list::run(args),
        Some(Commands::Completions(args)) => commands::completions::run(args),
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }
}
