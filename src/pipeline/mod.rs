//! Ingestion orchestrator
//!
//! Drives every selected entry through fetch → extract → validate → merge,
//! one entry at a time, in configuration order. A failing entry is recorded
//! in the report and the batch moves on; only run-level preconditions
//! (config, output directory, registry) abort the run.
//!
//! Writes are confined to the entry's destination and the registry. Extracted
//! files are staged in a hidden scratch directory inside the output root and
//! renamed into place by an [`EntryTransaction`], which puts the previous
//! destination back if the registry merge fails.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{SourceConfig, SourceEntry};
use crate::error::extract::copy_failure;
use crate::error::{IngestError, Result, Stage};
use crate::extract::extract;
use crate::fetch::{ContentFetcher, FetchHint};
use crate::hash;
use crate::registry::{MergeOutcome, RegistryUpdater};
use crate::report::{EntryOutcome, EntryReport, RunReport};
use crate::source::SourceRef;
use crate::temp;
use crate::transaction::EntryTransaction;
use crate::ui::ProgressReporter;
use crate::validate::{normalize, validate_entry};

/// Options for one run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Process only this entry; `None` processes all of them
    pub skill_id: Option<String>,
    pub dry_run: bool,
    /// Re-ingest even when content and registry record are unchanged
    pub force: bool,
    /// Merge records into the registry (`--no-marketplace` turns this off)
    pub update_registry: bool,
}

/// Per-entry state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    Pending,
    Fetching,
    Extracting,
    Validating,
    Merging,
    Done,
    Failed { stage: Stage, reason: String },
}

impl EntryState {
    /// Stage of a working state
    pub fn stage(&self) -> Option<Stage> {
        match self {
            EntryState::Fetching => Some(Stage::Fetching),
            EntryState::Extracting => Some(Stage::Extracting),
            EntryState::Validating => Some(Stage::Validating),
            EntryState::Merging => Some(Stage::Merging),
            _ => None,
        }
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryState::Pending => f.write_str("pending"),
            EntryState::Done => f.write_str("done"),
            EntryState::Failed { stage, .. } => write!(f, "failed({})", stage),
            working => match working.stage() {
                Some(stage) => write!(f, "{}", stage),
                None => f.write_str("unknown"),
            },
        }
    }
}

/// Tracks one entry's state and mirrors transitions to logs and progress
struct EntryTracker<'p> {
    id: String,
    state: EntryState,
    progress: &'p mut dyn ProgressReporter,
}

impl<'p> EntryTracker<'p> {
    fn new(id: &str, progress: &'p mut dyn ProgressReporter) -> Self {
        Self {
            id: id.to_string(),
            state: EntryState::Pending,
            progress,
        }
    }

    fn advance(&mut self, next: EntryState) {
        debug!(entry = %self.id, from = %self.state, to = %next, "transition");
        if let Some(stage) = next.stage() {
            self.progress.stage(&self.id, stage);
        }
        self.state = next;
    }

    fn fail(&mut self, err: &IngestError) -> EntryOutcome {
        let stage = self
            .state
            .stage()
            .or_else(|| err.stage())
            .unwrap_or(Stage::Fetching);
        let reason = err.to_string();
        warn!(entry = %self.id, %stage, "{}", reason);
        self.advance(EntryState::Failed {
            stage,
            reason: reason.clone(),
        });
        EntryOutcome::Failed { stage, reason }
    }
}

/// Per-entry bookkeeping that ends up in the report
#[derive(Default)]
struct EntryNotes {
    files: Option<usize>,
    warnings: Vec<String>,
}

/// Check the output directory before any entry runs
fn check_output_dir(output: &Path, dry_run: bool) -> Result<()> {
    if !output.is_dir() {
        return Err(IngestError::OutputDirMissing {
            path: output.display().to_string(),
        });
    }
    if !dry_run {
        temp::scratch_dir_in(output, "writable").map_err(|e| IngestError::OutputDirNotWritable {
            path: output.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

/// One ingestion run over a loaded Source Config
pub struct Pipeline<'a> {
    config: &'a SourceConfig,
    fetcher: &'a dyn ContentFetcher,
    registry: Option<RegistryUpdater>,
    options: RunOptions,
}

impl<'a> Pipeline<'a> {
    /// Check run-level preconditions and load the registry
    pub fn new(
        config: &'a SourceConfig,
        fetcher: &'a dyn ContentFetcher,
        options: RunOptions,
    ) -> Result<Self> {
        check_output_dir(&config.output_directory, options.dry_run)?;

        let registry = if options.update_registry {
            let registry = RegistryUpdater::open(&config.marketplace_path)?;
            debug!(
                path = %registry.path().display(),
                plugins = registry.marketplace().plugins.len(),
                "registry loaded"
            );
            Some(registry)
        } else {
            info!("registry updates disabled");
            None
        };

        Ok(Self {
            config,
            fetcher,
            registry,
            options,
        })
    }

    /// Process the selected entries and report on each
    pub fn run(&mut self, progress: &mut dyn ProgressReporter) -> Result<RunReport> {
        let config = self.config;
        let entries = config.select(self.options.skill_id.as_deref())?;
        let total = entries.len();
        info!(
            total,
            dry_run = self.options.dry_run,
            force = self.options.force,
            "starting ingestion"
        );

        let mut report = RunReport {
            dry_run: self.options.dry_run,
            entries: Vec::with_capacity(total),
        };

        for (index, entry) in entries.into_iter().enumerate() {
            progress.start_entry(&entry.id, index + 1, total);
            report.entries.push(self.process(entry, progress));
            progress.finish_entry();
        }
        progress.finish();

        let counts = report.counts();
        info!(
            succeeded = counts.succeeded,
            skipped = counts.skipped,
            failed = counts.failed,
            "ingestion finished"
        );
        Ok(report)
    }

    fn process(&mut self, entry: &SourceEntry, progress: &mut dyn ProgressReporter) -> EntryReport {
        let mut tracker = EntryTracker::new(&entry.id, progress);
        let mut notes = EntryNotes::default();
        info!(
            entry = %entry.id,
            source = %entry.github_url,
            about = entry.description.as_deref().unwrap_or(""),
            "processing entry"
        );

        let outcome = match self.ingest(entry, &mut tracker, &mut notes) {
            Ok(outcome) => {
                tracker.advance(EntryState::Done);
                info!(entry = %entry.id, outcome = ?outcome, "entry done");
                outcome
            }
            Err(err) => tracker.fail(&err),
        };

        EntryReport {
            id: entry.id.clone(),
            outcome,
            files: notes.files,
            warnings: notes.warnings,
        }
    }

    fn ingest(
        &mut self,
        entry: &SourceEntry,
        tracker: &mut EntryTracker<'_>,
        notes: &mut EntryNotes,
    ) -> Result<EntryOutcome> {
        let RunOptions { dry_run, force, .. } = self.options;
        let destination = self.config.destination(entry);

        tracker.advance(EntryState::Fetching);
        let source = SourceRef::parse(&entry.github_url, &self.config.base_dir)?;
        let staged = self.fetcher.fetch(
            &source,
            FetchHint::for_extraction(&entry.extraction_config.extraction),
        )?;

        tracker.advance(EntryState::Extracting);
        let scratch = if dry_run {
            temp::scratch_dir("dry-run")
        } else {
            temp::scratch_dir_in(&self.config.output_directory, "pending")
        }
        .map_err(|e| {
            copy_failure(
                staged.root().display().to_string(),
                destination.display().to_string(),
                e.to_string(),
            )
        })?;
        let pending = scratch.path().join("entry");
        let extracted = extract(staged.root(), &entry.extraction_config, &pending)?;
        notes.files = Some(extracted.files);
        drop(staged);

        tracker.advance(EntryState::Validating);
        let validated = validate_entry(&pending, entry)?;
        notes
            .warnings
            .extend(validated.warnings.iter().map(ToString::to_string));
        let record = normalize(entry, &validated.record);

        let plan = self.registry.as_ref().map(|r| r.plan(&record, force));
        if !force {
            let content_same = hash::same_content(&pending, &destination).unwrap_or_else(|e| {
                debug!(entry = %entry.id, error = %e, "could not compare content");
                false
            });
            let record_same = plan.as_ref().is_none_or(|p| *p == MergeOutcome::Unchanged);
            if content_same && record_same {
                return Ok(EntryOutcome::Skipped {
                    reason: "unchanged".to_string(),
                });
            }
        }

        let replaces = match &plan {
            Some(plan) => *plan != MergeOutcome::Added,
            None => destination.exists(),
        };

        if dry_run {
            return Ok(if replaces {
                EntryOutcome::WouldReplace
            } else {
                EntryOutcome::WouldAdd
            });
        }

        tracker.advance(EntryState::Merging);
        let backup = scratch.path().join("previous");
        let transaction = EntryTransaction::install(&pending, &destination, &backup)
            .map_err(|e| IngestError::IoError {
                message: format!("failed to install {}: {}", destination.display(), e),
            })?;
        if let Some(registry) = self.registry.as_mut() {
            registry.merge(record, force, false)?;
        }
        transaction.commit();

        Ok(if replaces {
            EntryOutcome::Replaced
        } else {
            EntryOutcome::Added
        })
    }
}
