//! Fetch command implementation
//!
//! Loads the Source Config, runs the ingestion pipeline over the selected
//! entries and prints the run report.

use tracing::debug;

use crate::cli::FetchArgs;
use crate::config::SourceConfig;
use crate::error::{IngestError, Result};
use crate::fetch::{Fetcher, RetryPolicy};
use crate::pipeline::{Pipeline, RunOptions};
use crate::ui::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter};

/// Run fetch command
pub fn run(args: FetchArgs, quiet: bool) -> Result<()> {
    let config = SourceConfig::load(&args.config.config)?;
    debug!(
        config = %args.config.config.display(),
        entries = config.skills.len(),
        "loaded source config"
    );

    let options = RunOptions {
        skill_id: args.skill.clone(),
        dry_run: args.dry_run,
        force: args.force,
        update_registry: !args.no_marketplace,
    };
    // Unknown --skill ids fail here, before any network access
    let total = config.select(options.skill_id.as_deref())?.len();

    let fetcher = Fetcher::new(RetryPolicy::default())?;
    let mut pipeline = Pipeline::new(&config, &fetcher, options)?;

    let mut progress: Box<dyn ProgressReporter> = if quiet || args.json {
        Box::new(SilentProgressReporter)
    } else {
        Box::new(InteractiveProgressReporter::new(total as u64))
    };
    let report = pipeline.run(progress.as_mut())?;

    if args.json {
        let json = report.to_json().map_err(|e| IngestError::IoError {
            message: format!("Failed to serialize report: {}", e),
        })?;
        println!("{}", json);
    } else {
        print!("{}", report.render());
    }

    if args.fail_on_error && report.has_failures() {
        return Err(IngestError::EntriesFailed {
            count: report.counts().failed,
        });
    }
    Ok(())
}
