//! Marketplace document for `.claude-plugin/marketplace.json`
//!
//! This is the registry the showcase UI reads as a static asset. Unknown keys
//! at the top level and on each plugin are kept so a round-trip through this
//! tool never drops data written by other tools.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::merge::{schema_invalid, write_failed};
use crate::error::MergeError;

/// Registry owner contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceOwner {
    pub name: String,
    pub email: String,
}

/// One registered skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplacePlugin {
    pub name: String,
    pub description: String,
    pub source: String,
    pub category: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketplacePlugin {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            source: source.into(),
            category: category.into(),
            extra: Map::new(),
        }
    }

    /// Whether the fields this tool manages are identical
    pub fn same_content(&self, other: &MarketplacePlugin) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.source == other.source
            && self.category == other.category
    }
}

/// The whole registry document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marketplace {
    pub name: String,
    pub version: String,
    pub description: String,
    pub owner: MarketplaceOwner,
    #[serde(default)]
    pub plugins: Vec<MarketplacePlugin>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Marketplace {
    /// Parse marketplace.json from a file path
    pub fn from_file(path: &Path) -> Result<Self, MergeError> {
        let content = std::fs::read_to_string(path).map_err(|e| MergeError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| match e {
            MergeError::Unreadable { reason, .. } => MergeError::Unreadable {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse marketplace JSON text
    pub fn from_json(content: &str) -> Result<Self, MergeError> {
        let value: Value = serde_json::from_str(content).map_err(|e| MergeError::Unreadable {
            path: "<memory>".to_string(),
            reason: format!("Invalid JSON: {}", e),
        })?;
        let marketplace: Marketplace =
            serde_json::from_value(value).map_err(|e| schema_invalid(e.to_string()))?;
        marketplace.validate_schema()?;
        Ok(marketplace)
    }

    /// Check the invariants consumers rely on
    pub fn validate_schema(&self) -> Result<(), MergeError> {
        let required = [
            ("name", &self.name),
            ("version", &self.version),
            ("owner.name", &self.owner.name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(schema_invalid(format!("'{}' must not be empty", field)));
            }
        }

        let mut seen = HashSet::new();
        for (index, plugin) in self.plugins.iter().enumerate() {
            if plugin.name.trim().is_empty() {
                return Err(schema_invalid(format!("plugins[{}] has an empty name", index)));
            }
            if plugin.source.trim().is_empty() {
                return Err(schema_invalid(format!(
                    "plugin '{}' has an empty source",
                    plugin.name
                )));
            }
            if !seen.insert(plugin.name.as_str()) {
                return Err(schema_invalid(format!(
                    "plugin '{}' is listed more than once",
                    plugin.name
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&MarketplacePlugin> {
        self.plugins.iter().find(|p| p.name == name)
    }

    #[cfg(test)]
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name.as_str()).collect()
    }

    /// Serialize as the on-disk format: two-space indent, trailing newline
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        Ok(content)
    }

    /// Save atomically: validate, serialize, write a sibling temp file, rename.
    ///
    /// Readers never observe a truncated or half-written registry, and a
    /// failure at any step leaves the previous file untouched.
    pub fn save(&self, path: &Path) -> Result<(), MergeError> {
        self.validate_schema()?;
        let content = self
            .to_json()
            .map_err(|e| write_failed(path.display().to_string(), e.to_string()))?;
        write_atomic(path, |file| file.write_all(content.as_bytes()))
    }
}

/// Write `path` through a temp file in the same directory.
///
/// `write` fills the temp file; when it fails the temp file is removed and
/// `path` is not touched.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<(), MergeError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let fail = |reason: String| write_failed(path.display().to_string(), reason);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| fail(e.to_string()))?;
    write(tmp.as_file_mut()).map_err(|e| fail(e.to_string()))?;
    tmp.as_file().sync_all().map_err(|e| fail(e.to_string()))?;
    tmp.persist(path).map_err(|e| fail(e.error.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
  "name": "awesome-claude-skills",
  "version": "1.0.0",
  "description": "A curated skills vault",
  "owner": { "name": "Vault Maintainers", "email": "vault@example.com" },
  "metadata": { "homepage": "https://example.com" },
  "plugins": [
    {
      "name": "pdf",
      "description": "Use when working with PDF files",
      "source": "./document-processing/pdf",
      "category": "document-processing",
      "keywords": ["pdf"]
    }
  ]
}
"#;

    #[test]
    fn test_parse_marketplace() {
        let marketplace = Marketplace::from_json(SAMPLE).unwrap();
        assert_eq!(marketplace.name, "awesome-claude-skills");
        assert_eq!(marketplace.owner.email, "vault@example.com");
        assert_eq!(marketplace.names(), vec!["pdf"]);
        assert_eq!(
            marketplace.get("pdf").unwrap().category,
            "document-processing"
        );
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let marketplace = Marketplace::from_json(SAMPLE).unwrap();
        let json = marketplace.to_json().unwrap();
        let reparsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed["metadata"]["homepage"], "https://example.com");
        assert_eq!(reparsed["plugins"][0]["keywords"][0], "pdf");
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_invalid_json_is_unreadable() {
        assert!(matches!(
            Marketplace::from_json("{ broken"),
            Err(MergeError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_missing_required_field_is_schema_error() {
        let json = r#"{"name": "x", "version": "1", "description": "d", "plugins": []}"#;
        assert!(matches!(
            Marketplace::from_json(json),
            Err(MergeError::SchemaInvalid { .. })
        ));
    }

    #[test]
    fn test_duplicate_plugin_names_rejected() {
        let mut marketplace = Marketplace::from_json(SAMPLE).unwrap();
        let dup = marketplace.plugins[0].clone();
        marketplace.plugins.push(dup);
        assert!(matches!(
            marketplace.validate_schema(),
            Err(MergeError::SchemaInvalid { .. })
        ));
    }

    #[test]
    fn test_save_writes_and_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("marketplace.json");
        let marketplace = Marketplace::from_json(SAMPLE).unwrap();

        marketplace.save(&path).unwrap();

        let reloaded = Marketplace::from_file(&path).unwrap();
        assert_eq!(reloaded, marketplace);
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_original_byte_for_byte() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("marketplace.json");
        fs::write(&path, SAMPLE).unwrap();

        let result = write_atomic(&path, |file| {
            file.write_all(b"{ \"name\": \"half-writ")?;
            Err(io::Error::other("No space left on device"))
        });

        assert!(matches!(result, Err(MergeError::WriteFailed { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "temp file should be cleaned up");
    }

    #[test]
    fn test_save_refuses_invalid_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("marketplace.json");
        fs::write(&path, SAMPLE).unwrap();

        let mut marketplace = Marketplace::from_json(SAMPLE).unwrap();
        marketplace.name = String::new();

        assert!(marketplace.save(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
    }
}
