//! Transaction support for replacing an entry's destination directory
//!
//! The extracted files are staged in a pending directory inside the output
//! root. Installing them moves the current destination aside and renames the
//! pending directory into place; both are same-filesystem renames.
//!
//! ## Usage
//!
//! ```ignore
//! let transaction = EntryTransaction::install(&pending, &destination, &backup)?;
//!
//! // Merge the registry record...
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // the previous destination is restored
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::common::fs::remove_dir_if_exists;

/// A swap of one destination directory that can be undone
#[derive(Debug)]
pub struct EntryTransaction {
    destination: PathBuf,

    /// Where the previous destination was moved, if there was one
    backup: Option<PathBuf>,

    /// Topmost parent directory created for the destination
    created_dir: Option<PathBuf>,

    committed: bool,
}

impl EntryTransaction {
    /// Move `pending` to `destination`, keeping any previous destination at
    /// `backup` until the transaction commits.
    pub fn install(pending: &Path, destination: &Path, backup: &Path) -> io::Result<Self> {
        let created_dir = destination
            .ancestors()
            .skip(1)
            .take_while(|dir| !dir.exists())
            .last()
            .map(Path::to_path_buf);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        let backup = if destination.exists() {
            fs::rename(destination, backup)?;
            Some(backup.to_path_buf())
        } else {
            None
        };

        let transaction = Self {
            destination: destination.to_path_buf(),
            backup,
            created_dir,
            committed: false,
        };

        // On failure, Drop puts the previous destination back
        fs::rename(pending, destination)?;
        debug!(destination = %destination.display(), "installed entry");
        Ok(transaction)
    }

    /// Keep the new destination and drop the backup
    pub fn commit(mut self) {
        self.committed = true;
        if let Some(backup) = &self.backup {
            if let Err(e) = remove_dir_if_exists(backup) {
                warn!(path = %backup.display(), error = %e, "failed to remove previous entry backup");
            }
        }
    }

    /// Restore the state from before `install`
    pub fn rollback(&mut self) -> io::Result<()> {
        if self.committed {
            return Ok(());
        }

        remove_dir_if_exists(&self.destination)?;
        if let Some(backup) = self.backup.take() {
            fs::rename(&backup, &self.destination)?;
        }
        if let Some(dir) = self.created_dir.take() {
            remove_dir_if_exists(&dir)?;
        }
        self.committed = true;
        debug!(destination = %self.destination.display(), "rolled back entry");
        Ok(())
    }
}

impl Drop for EntryTransaction {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = self.rollback() {
                warn!(
                    destination = %self.destination.display(),
                    error = %e,
                    "rollback failed"
                );
            }
        }
    }
}
