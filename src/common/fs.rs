//! File system helpers shared by the fetchers and the extractor

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;
use wax::{CandidatePath, Glob, Pattern};

/// What to skip while copying a tree
#[derive(Debug, Default, Clone)]
pub struct CopyOptions {
    /// Globs matched against each file or directory name
    pub exclude: Vec<String>,
}

impl CopyOptions {
    pub fn exclude_git() -> Self {
        Self {
            exclude: vec![".git".to_string()],
        }
    }

    pub fn with_patterns(patterns: &[String]) -> Self {
        Self {
            exclude: patterns.to_vec(),
        }
    }

    /// Whether a file or directory name matches an exclude pattern
    pub fn is_excluded(&self, name: &str) -> bool {
        let candidate = CandidatePath::from(name);
        self.exclude.iter().any(|pattern| {
            pattern == name
                || Glob::new(pattern)
                    .map(|glob| glob.matched(&candidate).is_some())
                    .unwrap_or(false)
        })
    }
}

/// Copy a directory recursively, returning the number of files copied.
///
/// Symlinks are skipped, file or directory: their targets may lie outside
/// the tree being copied.
pub fn copy_dir_recursive<P1, P2>(src: P1, dst: P2, options: &CopyOptions) -> io::Result<usize>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();

    fs::create_dir_all(dst_ref)?;

    let mut copied = 0;
    for entry in fs::read_dir(src_ref)? {
        let entry = entry?;
        let entry_path = entry.path();
        let file_name = entry.file_name();

        if options.is_excluded(&file_name.to_string_lossy()) {
            debug!(path = %entry_path.display(), "excluded");
            continue;
        }

        let dst_path = dst_ref.join(&file_name);
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            debug!(path = %entry_path.display(), "skipping symlink");
        } else if file_type.is_dir() {
            copied += copy_dir_recursive(&entry_path, &dst_path, options)?;
        } else {
            fs::copy(&entry_path, &dst_path)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Remove a directory tree, treating "already gone" as success
pub fn remove_dir_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
