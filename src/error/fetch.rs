//! Fetch errors
//!
//! Retryable failures (network errors, rate limits, server errors) are retried
//! with backoff before they surface; non-retryable ones fail immediately.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone)]
pub enum FetchError {
    #[error("Transient fetch failure for {source_ref}: {reason}")]
    #[diagnostic(
        code(skill_ingest::fetch::retryable),
        help("Set GITHUB_TOKEN for a higher rate limit, or try again later")
    )]
    Retryable { source_ref: String, reason: String },

    #[error("Failed to fetch {source_ref}: {reason}")]
    #[diagnostic(
        code(skill_ingest::fetch::non_retryable),
        help("Check that the repository and path exist and are accessible")
    )]
    NonRetryable { source_ref: String, reason: String },
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Retryable { .. })
    }
}

/// Creates a retryable fetch error
pub fn retryable(source_ref: impl Into<String>, reason: impl Into<String>) -> FetchError {
    FetchError::Retryable {
        source_ref: source_ref.into(),
        reason: reason.into(),
    }
}

/// Creates a non-retryable fetch error
pub fn non_retryable(source_ref: impl Into<String>, reason: impl Into<String>) -> FetchError {
    FetchError::NonRetryable {
        source_ref: source_ref.into(),
        reason: reason.into(),
    }
}
