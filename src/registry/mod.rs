//! Registry Updater
//!
//! Single writer for the marketplace document. The pipeline owns exactly one
//! [`RegistryUpdater`] for a run, so every merge is funneled through
//! `&mut self` and persisted with [`Marketplace::save`]'s atomic write before
//! the next entry starts.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{Marketplace, MarketplacePlugin};
use crate::error::MergeError;

/// What a merge did (or would do, in dry-run)
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// Appended a record that was not registered before
    Added,
    /// Replaced the record in place; carries the previous version
    Replaced { previous: MarketplacePlugin },
    /// Identical record already present; nothing written
    Unchanged,
}

/// Owns the in-memory registry and its file
#[derive(Debug)]
pub struct RegistryUpdater {
    path: PathBuf,
    marketplace: Marketplace,
}

impl RegistryUpdater {
    /// Load the registry; a missing or invalid file is a run-level failure
    pub fn open(path: &Path) -> Result<Self, MergeError> {
        let marketplace = Marketplace::from_file(path)?;
        debug!(
            path = %path.display(),
            plugins = marketplace.plugins.len(),
            "loaded registry"
        );
        Ok(Self {
            path: path.to_path_buf(),
            marketplace,
        })
    }

    pub fn marketplace(&self) -> &Marketplace {
        &self.marketplace
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Outcome `merge` would have, without touching anything
    pub fn plan(&self, record: &MarketplacePlugin, force: bool) -> MergeOutcome {
        match self.marketplace.get(&record.name) {
            None => MergeOutcome::Added,
            Some(existing) if !force && existing.same_content(record) => MergeOutcome::Unchanged,
            Some(existing) => MergeOutcome::Replaced {
                previous: existing.clone(),
            },
        }
    }

    /// Merge a record by name and persist.
    ///
    /// An existing record with the same name is replaced at its position;
    /// unknown keys it carried are kept unless the new record sets them.
    /// With `dry_run` the outcome is computed but nothing is written. When the
    /// write fails the in-memory document is rolled back along with the file.
    pub fn merge(
        &mut self,
        record: MarketplacePlugin,
        force: bool,
        dry_run: bool,
    ) -> Result<MergeOutcome, MergeError> {
        let outcome = self.plan(&record, force);
        if dry_run || outcome == MergeOutcome::Unchanged {
            return Ok(outcome);
        }

        let snapshot = self.marketplace.plugins.clone();
        match self
            .marketplace
            .plugins
            .iter()
            .position(|p| p.name == record.name)
        {
            Some(index) => {
                let existing = &mut self.marketplace.plugins[index];
                let mut extra = std::mem::take(&mut existing.extra);
                extra.extend(record.extra.clone());
                *existing = MarketplacePlugin { extra, ..record };
            }
            None => self.marketplace.plugins.push(record),
        }

        if let Err(e) = self.marketplace.save(&self.path) {
            self.marketplace.plugins = snapshot;
            return Err(e);
        }

        info!(
            path = %self.path.display(),
            total = self.marketplace.plugins.len(),
            "registry updated"
        );
        Ok(outcome)
    }
}
