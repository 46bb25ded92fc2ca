//! Source Config handling
//!
//! The Source Config is a JSON file maintained by hand that lists every
//! external skill to ingest. It is either a bare array of entries or a
//! document:
//!
//! ```json
//! {
//!   "output_directory": ".",
//!   "marketplace_path": ".claude-plugin/marketplace.json",
//!   "categories": ["document-processing"],
//!   "skills": [ { "id": "...", "github_url": "...", ... } ]
//! }
//! ```
//!
//! Loading validates the whole file up front; any problem is a
//! [`ConfigError`] and aborts the run before anything is fetched.

pub mod entry;
pub mod marketplace;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::config::{malformed, unreadable};
use crate::error::ConfigError;
use crate::path_utils::{normalize_relative, to_forward_slashes};
use crate::validate::validate_name;

pub use entry::{Extraction, ExtractionConfig, RepoType, SourceEntry};
pub use marketplace::{Marketplace, MarketplacePlugin};

/// Default Source Config file name, looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "external_skills_config.json";

/// Registry location relative to the output directory
pub const DEFAULT_MARKETPLACE_PATH: &str = ".claude-plugin/marketplace.json";

#[derive(Debug, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    output_directory: Option<PathBuf>,
    #[serde(default)]
    marketplace_path: Option<PathBuf>,
    #[serde(default)]
    categories: Option<Vec<String>>,
    skills: Vec<SourceEntry>,
}

/// A loaded and validated Source Config
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Root of the managed tree; every `target_folder` lives below it
    pub output_directory: PathBuf,
    pub marketplace_path: PathBuf,
    /// Known categories, when the config declares them
    pub categories: Option<Vec<String>>,
    pub skills: Vec<SourceEntry>,
    /// Directory relative local sources resolve against
    pub base_dir: PathBuf,
}

impl SourceConfig {
    /// Read and validate a Source Config file.
    ///
    /// Relative `output_directory` and `marketplace_path` values are resolved
    /// against the directory holding the config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| unreadable(path.display().to_string(), e.to_string()))?;
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::from_json(&content, base)
    }

    /// Parse a Source Config from JSON text, resolving paths against `base`
    pub fn from_json(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| malformed(format!("Invalid JSON: {}", e)))?;

        let document = if value.is_array() {
            let skills = serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
            ConfigDocument {
                output_directory: None,
                marketplace_path: None,
                categories: None,
                skills,
            }
        } else {
            serde_json::from_value::<ConfigDocument>(value)
                .map_err(|e| malformed(e.to_string()))?
        };

        let output_directory = match document.output_directory {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => base.join(dir),
            None => base.to_path_buf(),
        };
        let marketplace_path = match document.marketplace_path {
            Some(path) if path.is_absolute() => path,
            Some(path) => base.join(path),
            None => output_directory.join(DEFAULT_MARKETPLACE_PATH),
        };

        let mut config = Self {
            output_directory,
            marketplace_path,
            categories: document.categories,
            skills: document.skills,
            base_dir: base.to_path_buf(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check entry invariants and normalize target folders in place
    fn validate(&mut self) -> Result<(), ConfigError> {
        let mut ids = HashSet::new();
        let mut targets: HashMap<String, String> = HashMap::new();

        for entry in &mut self.skills {
            let id = entry.id.trim();
            if id.is_empty() {
                return Err(malformed("entry with an empty 'id'"));
            }
            if !ids.insert(id.to_string()) {
                return Err(ConfigError::DuplicateId { id: id.to_string() });
            }
            // The id is the registry key
            validate_name(id).map_err(|e| malformed(format!("entry '{}': {}", id, e)))?;

            let target = normalize_relative(&entry.target_folder).ok_or_else(|| {
                malformed(format!(
                    "entry '{}': target_folder '{}' must be a relative path inside the output directory",
                    entry.id, entry.target_folder
                ))
            })?;
            if let Some(first) = targets.insert(target.clone(), entry.id.clone()) {
                return Err(ConfigError::DuplicateTarget {
                    target,
                    first,
                    second: entry.id.clone(),
                });
            }
            entry.target_folder = target;

            if let Some(path) = entry.extraction_config.extraction.path() {
                if normalize_relative(path).is_none() {
                    return Err(malformed(format!(
                        "entry '{}': extraction path '{}' must stay inside the repository",
                        entry.id, path
                    )));
                }
            }

            if entry.repo_type == RepoType::MultiSkill
                && entry.extraction_config.extraction == Extraction::FullRepo
            {
                return Err(malformed(format!(
                    "entry '{}': multi_skill repositories need a subfolder or deep_nested extraction",
                    entry.id
                )));
            }

            if entry.category.trim().is_empty() {
                return Err(malformed(format!("entry '{}': empty category", entry.id)));
            }
            if let Some(known) = &self.categories {
                if !known.iter().any(|c| c == &entry.category) {
                    return Err(malformed(format!(
                        "entry '{}': unknown category '{}' (known: {})",
                        entry.id,
                        entry.category,
                        known.join(", ")
                    )));
                }
            }
        }

        self.check_target_overlap()
    }

    /// Reject targets nested in one another or overlapping the registry
    /// directory.
    fn check_target_overlap(&self) -> Result<(), ConfigError> {
        for (i, first) in self.skills.iter().enumerate() {
            for second in &self.skills[i + 1..] {
                let (a, b) = (&first.target_folder, &second.target_folder);
                let nested = if is_within(b, a) {
                    Some((first, second))
                } else if is_within(a, b) {
                    Some((second, first))
                } else {
                    None
                };
                if let Some((outer, inner)) = nested {
                    return Err(ConfigError::NestedTarget {
                        outer: outer.target_folder.clone(),
                        inner: inner.target_folder.clone(),
                        first: outer.id.clone(),
                        second: inner.id.clone(),
                    });
                }
            }
        }

        let Some(registry_dir) = self.registry_dir() else {
            return Ok(());
        };
        for entry in &self.skills {
            let target = &entry.target_folder;
            if is_within(target, &registry_dir) || is_within(&registry_dir, target) {
                return Err(ConfigError::RegistryOverlap {
                    target: target.clone(),
                    id: entry.id.clone(),
                    registry: registry_dir,
                });
            }
        }
        Ok(())
    }

    /// Registry directory relative to the output directory, when it lives
    /// below it
    fn registry_dir(&self) -> Option<String> {
        let dir = self.marketplace_path.parent()?;
        let relative = dir.strip_prefix(&self.output_directory).ok()?;
        normalize_relative(&to_forward_slashes(relative))
    }

    /// Entries selected by `--skill <id>`, or every entry
    pub fn select(&self, skill_id: Option<&str>) -> Result<Vec<&SourceEntry>, ConfigError> {
        match skill_id {
            Some(id) => self
                .skills
                .iter()
                .find(|e| e.id == id)
                .map(|e| vec![e])
                .ok_or_else(|| ConfigError::UnknownEntry { id: id.to_string() }),
            None => Ok(self.skills.iter().collect()),
        }
    }

    /// Absolute destination directory of an entry
    pub fn destination(&self, entry: &SourceEntry) -> PathBuf {
        self.output_directory.join(&entry.target_folder)
    }
}

/// Whether `path` equals `root` or lies below it, compared by component
fn is_within(path: &str, root: &str) -> bool {
    path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}
