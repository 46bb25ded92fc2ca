//! Content fetching
//!
//! A [`ContentFetcher`] turns a [`SourceRef`] into [`StagedContent`]: a
//! scratch directory holding the source's files at their repository-relative
//! paths. The scratch directory is removed when the `StagedContent` is
//! dropped, on success and failure alike.
//!
//! - [`github`]: GitHub Contents API with a `git2` clone fallback
//! - [`local`]: local directories (offline mirrors, tests)
//! - [`retry`]: bounded exponential backoff

pub mod github;
pub mod local;
pub mod retry;

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::warn;

use crate::config::Extraction;
use crate::error::FetchError;
use crate::error::fetch::non_retryable;
use crate::source::SourceRef;
use crate::temp;

pub use github::GitHubFetcher;
pub use local::LocalFetcher;
pub use retry::RetryPolicy;

/// Which part of the source the extractor will need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchHint<'a> {
    /// Repository-relative path to extract, `None` for the whole tree
    pub path: Option<&'a str>,
}

impl<'a> FetchHint<'a> {
    pub fn for_extraction(extraction: &'a Extraction) -> Self {
        Self {
            path: extraction.path(),
        }
    }

    #[cfg(test)]
    pub fn whole_tree() -> Self {
        Self { path: None }
    }
}

/// Fetched content in a scratch directory
#[derive(Debug)]
pub struct StagedContent {
    dir: Option<TempDir>,
    root: PathBuf,
}

impl StagedContent {
    /// Scratch directory under the system temp directory for `source`
    pub fn create(source: &str) -> Result<Self, FetchError> {
        let dir = temp::scratch_dir("fetch")
            .map_err(|e| non_retryable(source, format!("cannot create scratch directory: {}", e)))?;
        let root = dir.path().join("content");
        Ok(Self {
            dir: Some(dir),
            root,
        })
    }

    /// Top of the staged tree; extraction paths are relative to it
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Narrow the root to a sub-path, e.g. the prefix of a `/tree/<ref>/<path>` URL
    pub fn narrow(&mut self, sub: &str) {
        self.root = self.root.join(sub);
    }
}

impl Drop for StagedContent {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                warn!(path = %path.display(), error = %e, "failed to clean up scratch directory");
            }
        }
    }
}

/// Retrieves the content a source reference points at
pub trait ContentFetcher {
    fn fetch(&self, source: &SourceRef, hint: FetchHint<'_>) -> Result<StagedContent, FetchError>;
}

/// Dispatches to the GitHub or local fetcher by source kind
pub struct Fetcher {
    github: GitHubFetcher,
    local: LocalFetcher,
}

impl Fetcher {
    pub fn new(retry: RetryPolicy) -> Result<Self, FetchError> {
        Ok(Self {
            github: GitHubFetcher::new(retry)?,
            local: LocalFetcher,
        })
    }
}

impl ContentFetcher for Fetcher {
    fn fetch(&self, source: &SourceRef, hint: FetchHint<'_>) -> Result<StagedContent, FetchError> {
        match source {
            SourceRef::GitHub(_) => self.github.fetch(source, hint),
            SourceRef::Dir { .. } => self.local.fetch(source, hint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_staged_content_is_removed_on_drop() {
        let staged = StagedContent::create("test").unwrap();
        fs::create_dir_all(staged.root()).unwrap();
        fs::write(staged.root().join("SKILL.md"), "x").unwrap();
        let scratch = staged.root().parent().unwrap().to_path_buf();
        assert!(scratch.exists());

        drop(staged);
        assert!(!scratch.exists());
    }

    #[test]
    fn test_narrow_joins_prefix() {
        let mut staged = StagedContent::create("test").unwrap();
        let base = staged.root().to_path_buf();
        staged.narrow("skills/pdf");
        assert_eq!(staged.root(), base.join("skills/pdf"));
    }

    #[test]
    fn test_hint_follows_extraction() {
        let extraction = Extraction::DeepNested {
            path: "a/b".to_string(),
        };
        assert_eq!(FetchHint::for_extraction(&extraction).path, Some("a/b"));
        assert_eq!(FetchHint::for_extraction(&Extraction::FullRepo).path, None);
    }
}
