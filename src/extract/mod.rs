//! Extraction of an entry's files from staged content
//!
//! Copies the part of the staged tree selected by the entry's
//! [`Extraction`] strategy into a fresh destination directory, skipping
//! names matched by the exclude patterns.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::fs::{CopyOptions, copy_dir_recursive, remove_dir_if_exists};
use crate::config::{Extraction, ExtractionConfig};
use crate::error::ExtractError;
use crate::error::extract::{copy_failure, path_not_found};
use crate::path_utils::normalize_relative;

/// Result of a successful extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEntry {
    pub path: PathBuf,
    pub files: usize,
}

/// Resolve the directory to extract, checking each path segment in turn.
///
/// A segment that is a symlink counts as missing so extraction never leaves
/// the staged tree.
fn resolve_source(root: &Path, extraction: &Extraction) -> Result<PathBuf, ExtractError> {
    let Some(path) = extraction.path() else {
        if !root.is_dir() {
            return Err(path_not_found(".", "."));
        }
        return Ok(root.to_path_buf());
    };

    let normalized = normalize_relative(path).ok_or_else(|| path_not_found(path, path))?;

    let mut current = root.to_path_buf();
    for segment in normalized.split('/') {
        current.push(segment);
        let is_real_dir = fs::symlink_metadata(&current)
            .map(|meta| meta.file_type().is_dir())
            .unwrap_or(false);
        if !is_real_dir {
            return Err(path_not_found(path, segment));
        }
    }
    Ok(current)
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}

/// Copy the selected part of `staged_root` into `destination`.
///
/// The destination is recreated from scratch; previous contents are never
/// merged with the new files.
pub fn extract(
    staged_root: &Path,
    config: &ExtractionConfig,
    destination: &Path,
) -> Result<ExtractedEntry, ExtractError> {
    let extraction = &config.extraction;
    let source = resolve_source(staged_root, extraction)?;
    let label = extraction.path().unwrap_or(".");

    if is_empty_dir(&source) {
        let last = label.rsplit('/').next().unwrap_or(label);
        return Err(path_not_found(label, last));
    }

    let fail = |reason: String| {
        copy_failure(
            source.display().to_string(),
            destination.display().to_string(),
            reason,
        )
    };

    remove_dir_if_exists(destination).map_err(|e| fail(e.to_string()))?;
    let options = CopyOptions::with_patterns(&config.exclude_patterns);
    let files = copy_dir_recursive(&source, destination, &options).map_err(|e| fail(e.to_string()))?;

    if files == 0 {
        remove_dir_if_exists(destination).map_err(|e| fail(e.to_string()))?;
        return Err(fail("every file matched an exclude pattern".to_string()));
    }

    debug!(
        strategy = extraction.strategy_name(),
        path = label,
        destination = %destination.display(),
        files,
        "extracted"
    );

    Ok(ExtractedEntry {
        path: destination.to_path_buf(),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::entry::DEFAULT_EXCLUDE_PATTERNS;
    use tempfile::TempDir;

    fn config(extraction: Extraction) -> ExtractionConfig {
        ExtractionConfig {
            extraction,
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Repository with two sibling skills and some noise
    fn staged_repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "README.md", "# repo");
        write(root, "skills/pdf/SKILL.md", "---\nname: pdf\n---");
        write(root, "skills/pdf/scripts/extract.py", "print()");
        write(root, "skills/pdf/scripts/__pycache__/extract.pyc", "bc");
        write(root, "skills/docx/SKILL.md", "---\nname: docx\n---");
        write(root, ".github/workflows/ci.yml", "on: push");
        temp
    }

    #[test]
    fn test_full_repo_copies_everything_but_excludes() {
        let repo = staged_repo();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("dev/repo");

        let entry = extract(repo.path(), &config(Extraction::FullRepo), &dest).unwrap();

        assert_eq!(entry.files, 4);
        assert!(dest.join("README.md").exists());
        assert!(dest.join("skills/docx/SKILL.md").exists());
        assert!(!dest.join(".github").exists());
        assert!(!dest.join("skills/pdf/scripts/__pycache__").exists());
    }

    #[test]
    fn test_subfolder_has_no_sibling_leakage() {
        let repo = staged_repo();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("docs/pdf");

        let entry = extract(
            repo.path(),
            &config(Extraction::DeepNested {
                path: "skills/pdf".to_string(),
            }),
            &dest,
        )
        .unwrap();

        assert_eq!(entry.files, 2);
        assert!(dest.join("SKILL.md").exists());
        assert!(dest.join("scripts/extract.py").exists());
        assert!(!dest.join("docx").exists());
        assert!(!dest.join("README.md").exists());
    }

    #[test]
    fn test_missing_segment_is_named() {
        let repo = staged_repo();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("x");

        let err = extract(
            repo.path(),
            &config(Extraction::DeepNested {
                path: "skills/xlsx/inner".to_string(),
            }),
            &dest,
        )
        .unwrap_err();

        match err {
            ExtractError::PathNotFound { segment, .. } => assert_eq!(segment, "xlsx"),
            other => panic!("expected PathNotFound, got {:?}", other),
        }
        assert!(!dest.exists());
    }

    #[test]
    fn test_traversal_path_rejected() {
        let repo = staged_repo();
        let out = TempDir::new().unwrap();
        let err = extract(
            repo.path(),
            &config(Extraction::Subfolder {
                path: "../etc".to_string(),
            }),
            &out.path().join("x"),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::PathNotFound { .. }));
    }

    #[test]
    fn test_empty_source_directory_rejected() {
        let repo = staged_repo();
        fs::create_dir_all(repo.path().join("skills/empty")).unwrap();
        let out = TempDir::new().unwrap();

        let err = extract(
            repo.path(),
            &config(Extraction::Subfolder {
                path: "skills/empty".to_string(),
            }),
            &out.path().join("x"),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::PathNotFound { segment, .. } if segment == "empty"));
    }

    #[test]
    fn test_destination_is_recreated_fresh() {
        let repo = staged_repo();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("docs/pdf");
        write(&dest, "stale.txt", "old");

        extract(
            repo.path(),
            &config(Extraction::Subfolder {
                path: "skills/pdf".to_string(),
            }),
            &dest,
        )
        .unwrap();

        assert!(!dest.join("stale.txt").exists());
        assert!(dest.join("SKILL.md").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_segment_is_not_followed() {
        use std::os::unix::fs::symlink;

        let repo = staged_repo();
        let outside = TempDir::new().unwrap();
        write(outside.path(), "SKILL.md", "---\nname: outside\n---");
        symlink(outside.path(), repo.path().join("skills/escape")).unwrap();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("x");

        let err = extract(
            repo.path(),
            &config(Extraction::Subfolder {
                path: "skills/escape".to_string(),
            }),
            &dest,
        )
        .unwrap_err();

        assert!(matches!(err, ExtractError::PathNotFound { segment, .. } if segment == "escape"));
        assert!(!dest.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_not_copied() {
        use std::os::unix::fs::symlink;

        let repo = staged_repo();
        let outside = TempDir::new().unwrap();
        write(outside.path(), "secret.txt", "TOP-SECRET");
        symlink(
            outside.path().join("secret.txt"),
            repo.path().join("skills/pdf/leak"),
        )
        .unwrap();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("docs/pdf");

        let entry = extract(
            repo.path(),
            &config(Extraction::Subfolder {
                path: "skills/pdf".to_string(),
            }),
            &dest,
        )
        .unwrap();

        assert_eq!(entry.files, 2);
        assert!(fs::symlink_metadata(dest.join("leak")).is_err());
    }
}
