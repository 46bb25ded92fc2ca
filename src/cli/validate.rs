use clap::Args;
use std::path::PathBuf;

use super::ConfigArg;

/// Arguments for the validate command
#[derive(Args, Debug, Clone)]
#[command(after_help = "EXAMPLES:\n  \
                  Validate the vault named by the Source Config:\n    skill-ingest validate\n\n\
                  Validate any directory of skills:\n    skill-ingest validate --dir ./vault")]
pub struct ValidateArgs {
    /// Directory to scan instead of the configured output directory
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArg,
}
