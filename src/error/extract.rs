//! Extraction errors

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ExtractError {
    #[error("Path '{path}' not found in fetched content (missing segment '{segment}')")]
    #[diagnostic(
        code(skill_ingest::extract::path_not_found),
        help("Check extraction_config.path against the repository layout")
    )]
    PathNotFound { path: String, segment: String },

    #[error("Failed to copy {from} to {to}: {reason}")]
    #[diagnostic(code(skill_ingest::extract::copy_failure))]
    CopyFailure {
        from: String,
        to: String,
        reason: String,
    },
}

/// Creates a path-not-found error
pub fn path_not_found(path: impl Into<String>, segment: impl Into<String>) -> ExtractError {
    ExtractError::PathNotFound {
        path: path.into(),
        segment: segment.into(),
    }
}

/// Creates a copy failure error
pub fn copy_failure(
    from: impl Into<String>,
    to: impl Into<String>,
    reason: impl Into<String>,
) -> ExtractError {
    ExtractError::CopyFailure {
        from: from.into(),
        to: to.into(),
        reason: reason.into(),
    }
}
