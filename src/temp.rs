//! Scratch directories
//!
//! Staged content lives under the system temp directory and never under the
//! current working directory (e.g. when TMPDIR=tmp or TMPDIR=./tmp).

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Prefix of every scratch directory this tool creates
pub const SCRATCH_PREFIX: &str = "skill-ingest-";

/// Returns an absolute directory suitable for creating temporary directories.
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// Create a scratch directory under the system temp directory
pub fn scratch_dir(label: &str) -> io::Result<TempDir> {
    scratch_dir_in(&temp_dir_base(), label)
}

/// Create a hidden scratch directory inside `parent`
pub fn scratch_dir_in(parent: &Path, label: &str) -> io::Result<TempDir> {
    tempfile::Builder::new()
        .prefix(&format!(".{}{}-", SCRATCH_PREFIX, label))
        .tempdir_in(parent)
}
