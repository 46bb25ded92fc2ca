//! Local directory fetcher

use tracing::debug;

use super::{ContentFetcher, FetchHint, StagedContent};
use crate::common::fs::{CopyOptions, copy_dir_recursive};
use crate::error::FetchError;
use crate::error::fetch::non_retryable;
use crate::source::SourceRef;

/// Copies a local directory into staging
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFetcher;

impl ContentFetcher for LocalFetcher {
    fn fetch(&self, source: &SourceRef, _hint: FetchHint<'_>) -> Result<StagedContent, FetchError> {
        let SourceRef::Dir { path } = source else {
            return Err(non_retryable(source.to_string(), "not a local source"));
        };

        if !path.is_dir() {
            return Err(non_retryable(
                path.display().to_string(),
                "local source is not a directory",
            ));
        }

        let staged = StagedContent::create(&source.to_string())?;
        let copied = copy_dir_recursive(path, staged.root(), &CopyOptions::exclude_git())
            .map_err(|e| non_retryable(path.display().to_string(), e.to_string()))?;
        debug!(source = %path.display(), files = copied, "staged local source");
        Ok(staged)
    }
}
