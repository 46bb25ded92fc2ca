//! Error types and handling for skill-ingest
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Errors are grouped by the pipeline stage that raises them:
//! - [`config`]: Source Config loading and validation (fatal to a run)
//! - [`fetch`]: retrieving content from a source
//! - [`extract`]: isolating files from staged content
//! - [`validation`]: descriptor (`SKILL.md`) checks
//! - [`merge`]: registry loading, merging and persistence
//!
//! [`IngestError`] wraps them all for the command layer.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod merge;
pub mod validation;


use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

pub use config::ConfigError;
pub use extract::ExtractError;
pub use fetch::FetchError;
pub use merge::MergeError;
pub use validation::ValidationError;

/// Pipeline stage an entry was in when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fetching,
    Extracting,
    Validating,
    Merging,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetch",
            Stage::Extracting => "extract",
            Stage::Validating => "validate",
            Stage::Merging => "merge",
        };
        f.write_str(name)
    }
}

/// Main error type for skill-ingest operations
#[derive(Error, Diagnostic, Debug)]
pub enum IngestError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Merge(#[from] MergeError),

    // Preconditions checked before any entry runs
    #[error("Output directory does not exist: {path}")]
    #[diagnostic(
        code(skill_ingest::precondition::output_missing),
        help("Set `output_directory` in the config or create the directory first")
    )]
    OutputDirMissing { path: String },

    #[error("Output directory is not writable: {path}: {reason}")]
    #[diagnostic(code(skill_ingest::precondition::output_not_writable))]
    OutputDirNotWritable { path: String, reason: String },

    #[error("Validation failed for {count} skill(s)")]
    #[diagnostic(
        code(skill_ingest::validate::invalid_skills),
        help("Fix the descriptors listed in the report above")
    )]
    InvalidSkills { count: usize },

    #[error("{count} entr(y/ies) failed during ingestion")]
    #[diagnostic(code(skill_ingest::pipeline::entries_failed))]
    EntriesFailed { count: usize },

    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(skill_ingest::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(skill_ingest::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::IoError {
            message: err.to_string(),
        }
    }
}

impl IngestError {
    /// Stage an entry-local error belongs to, `None` for run-level errors
    pub fn stage(&self) -> Option<Stage> {
        match self {
            IngestError::Fetch(_) => Some(Stage::Fetching),
            IngestError::Extract(_) => Some(Stage::Extracting),
            IngestError::Validation(_) => Some(Stage::Validating),
            IngestError::Merge(_) => Some(Stage::Merging),
            _ => None,
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, IngestError>;
