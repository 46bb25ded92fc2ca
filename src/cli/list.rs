use clap::Args;

use super::ConfigArg;

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                  List all registered skills:\n    skill-ingest list\n\n\
                  List one category:\n    skill-ingest list --category document-processing")]
pub struct ListArgs {
    /// Only show skills in this category
    #[arg(long)]
    pub category: Option<String>,

    #[command(flatten)]
    pub config: ConfigArg,
}
