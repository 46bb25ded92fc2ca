use clap::Args;

use super::ConfigArg;

/// Arguments for fetching skills (also flattened into the top-level command)
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Fetch every configured skill (the default when --skill is absent)
    #[arg(long, conflicts_with = "skill")]
    pub all: bool,

    /// Fetch only the entry with this id
    #[arg(long, value_name = "SKILL_ID")]
    pub skill: Option<String>,

    /// Report what would change without writing to the vault or the registry
    #[arg(long)]
    pub dry_run: bool,

    /// Re-ingest entries even when content and registry record are unchanged
    #[arg(long)]
    pub force: bool,

    /// Do not update marketplace.json
    #[arg(long)]
    pub no_marketplace: bool,

    /// Exit with status 1 when any entry failed
    #[arg(long)]
    pub fail_on_error: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArg,
}
