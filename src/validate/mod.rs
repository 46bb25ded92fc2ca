//! Descriptor validation and normalization
//!
//! Every skill carries a `SKILL.md` whose YAML frontmatter names and
//! describes it. Checks run in a fixed order and stop at the first error:
//!
//! 1. `SKILL.md` exists at the skill root
//! 2. frontmatter parses into a mapping
//! 3. `name`, then `description`, are present and non-empty
//! 4. `name` is a safe identifier
//!
//! Passing descriptors are normalized into a registry record. Validation
//! only reads.

pub mod frontmatter;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Mapping;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::{MarketplacePlugin, SourceEntry};
use crate::error::ValidationError;
use crate::error::validation::{missing_field, parse_failure};
use crate::path_utils::to_kebab_case;

/// Descriptor file name at the root of every skill
pub const DESCRIPTOR_FILE: &str = "SKILL.md";

/// Descriptors smaller than this are suspicious
pub const MIN_DESCRIPTOR_BYTES: u64 = 50;

/// Parsed `SKILL.md` frontmatter
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorRecord {
    pub name: String,
    pub description: String,
    /// Remaining frontmatter keys
    pub extra: Mapping,
}

/// Non-fatal findings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    SmallDescriptor { bytes: u64 },
    NameMismatch { name: String, id: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::SmallDescriptor { bytes } => write!(
                f,
                "{} is only {} bytes; it may be incomplete",
                DESCRIPTOR_FILE, bytes
            ),
            ValidationWarning::NameMismatch { name, id } => write!(
                f,
                "descriptor name '{}' differs from entry id '{}'; the registry uses the id",
                name, id
            ),
        }
    }
}

/// A descriptor that passed validation, with its warnings
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub record: DescriptorRecord,
    pub warnings: Vec<ValidationWarning>,
}

/// Check a skill name: ASCII letters, digits, `-`, `_`, `.`; no leading dot
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let valid = !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidName {
            name: name.to_string(),
            suggestion: to_kebab_case(name),
        })
    }
}

/// Validate the `SKILL.md` at the root of `dir`
pub fn validate_descriptor(dir: &Path) -> Result<Validated, ValidationError> {
    let path = dir.join(DESCRIPTOR_FILE);
    let label = path.display().to_string();

    if !path.is_file() {
        return Err(ValidationError::DescriptorMissing {
            path: dir.display().to_string(),
        });
    }

    let content = fs::read_to_string(&path).map_err(|e| parse_failure(&label, e.to_string()))?;
    let (mut mapping, _body) =
        frontmatter::parse_frontmatter_and_body(&content).map_err(|reason| parse_failure(&label, reason))?;

    let name = frontmatter::get_str(&mapping, "name").ok_or_else(|| missing_field(&label, "name"))?;
    let description = frontmatter::get_str(&mapping, "description")
        .ok_or_else(|| missing_field(&label, "description"))?;
    validate_name(&name)?;

    mapping.remove("name");
    mapping.remove("description");

    let mut warnings = Vec::new();
    let bytes = content.len() as u64;
    if bytes < MIN_DESCRIPTOR_BYTES {
        warnings.push(ValidationWarning::SmallDescriptor { bytes });
    }

    Ok(Validated {
        record: DescriptorRecord {
            name,
            description,
            extra: mapping,
        },
        warnings,
    })
}

/// Validate an extracted entry; also warns when the descriptor name and the
/// entry id disagree
pub fn validate_entry(dir: &Path, entry: &SourceEntry) -> Result<Validated, ValidationError> {
    let mut validated = validate_descriptor(dir)?;
    if validated.record.name != entry.id {
        validated.warnings.push(ValidationWarning::NameMismatch {
            name: validated.record.name.clone(),
            id: entry.id.clone(),
        });
    }
    for warning in &validated.warnings {
        warn!(entry = %entry.id, "{}", warning);
    }
    Ok(validated)
}

/// Registry record for an entry: named by id, described by its descriptor
pub fn normalize(entry: &SourceEntry, record: &DescriptorRecord) -> MarketplacePlugin {
    MarketplacePlugin::new(
        entry.id.clone(),
        record.description.clone(),
        entry.registry_source(),
        entry.category.clone(),
    )
}

/// Validation outcome for one skill directory
#[derive(Debug)]
pub struct SkillValidation {
    /// Path relative to the scanned root
    pub path: PathBuf,
    pub result: Result<Validated, ValidationError>,
}

impl SkillValidation {
    pub fn is_valid(&self) -> bool {
        self.result.is_ok()
    }
}

/// Skill directories below `root`: directories holding a `SKILL.md`, at
/// most two levels deep, skipping hidden directories
pub fn find_skill_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir() && e.path().join(DESCRIPTOR_FILE).is_file())
        .map(|e| e.into_path())
        .collect();
    dirs.sort();
    dirs
}

/// Validate every skill directory below `root`
pub fn validate_all(root: &Path) -> Vec<SkillValidation> {
    find_skill_dirs(root)
        .into_iter()
        .map(|dir| SkillValidation {
            path: dir.strip_prefix(root).unwrap_or(&dir).to_path_buf(),
            result: validate_descriptor(&dir),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GOOD: &str = "---\nname: pdf-tools\ndescription: Work with PDF files, forms and tables\nlicense: MIT\n---\n\n# PDF\n";

    fn skill(content: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(DESCRIPTOR_FILE), content).unwrap();
        temp
    }

    fn entry(id: &str) -> SourceEntry {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "github_url": "https://github.com/example/repo",
            "target_folder": "document-processing/pdf-tools",
            "category": "document-processing",
            "extraction_config": {"strategy": "full_repo"}
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_descriptor() {
        let dir = skill(GOOD);
        let validated = validate_descriptor(dir.path()).unwrap();
        assert_eq!(validated.record.name, "pdf-tools");
        assert_eq!(validated.record.description, "Work with PDF files, forms and tables");
        assert!(validated.record.extra.contains_key("license"));
        assert!(validated.warnings.is_empty());
    }

    #[test]
    fn test_missing_descriptor() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            validate_descriptor(temp.path()),
            Err(ValidationError::DescriptorMissing { .. })
        ));
    }

    #[test]
    fn test_parse_failure() {
        let dir = skill("# No frontmatter here\n");
        assert!(matches!(
            validate_descriptor(dir.path()),
            Err(ValidationError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_name_checked_before_description() {
        let dir = skill("---\nlicense: MIT\n---\n");
        match validate_descriptor(dir.path()) {
            Err(ValidationError::MissingField { field, .. }) => assert_eq!(field, "name"),
            other => panic!("expected MissingField, got {:?}", other),
        }

        let dir = skill("---\nname: pdf\ndescription: \"\"\n---\n");
        match validate_descriptor(dir.path()) {
            Err(ValidationError::MissingField { field, .. }) => assert_eq!(field, "description"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_name_suggests_kebab_case() {
        let dir = skill("---\nname: PDF Tools/v2\ndescription: d\n---\n");
        match validate_descriptor(dir.path()) {
            Err(ValidationError::InvalidName { suggestion, .. }) => {
                assert_eq!(suggestion, "pdf-toolsv2")
            }
            other => panic!("expected InvalidName, got {:?}", other),
        }
        assert!(validate_name(".hidden").is_err());
        assert!(validate_name("d3.js_viz-2").is_ok());
    }

    #[test]
    fn test_warnings_small_file_and_name_mismatch() {
        let dir = skill("---\nname: x\ndescription: y\n---\n");
        let validated = validate_entry(dir.path(), &entry("pdf-tools")).unwrap();
        assert!(validated
            .warnings
            .iter()
            .any(|w| matches!(w, ValidationWarning::SmallDescriptor { .. })));
        assert!(validated
            .warnings
            .iter()
            .any(|w| matches!(w, ValidationWarning::NameMismatch { id, .. } if id == "pdf-tools")));
    }

    #[test]
    fn test_normalize_uses_entry_identity() {
        let dir = skill(GOOD);
        let validated = validate_descriptor(dir.path()).unwrap();
        let record = normalize(&entry("pdf-tools"), &validated.record);
        assert_eq!(record.name, "pdf-tools");
        assert_eq!(record.source, "./document-processing/pdf-tools");
        assert_eq!(record.category, "document-processing");
        assert_eq!(record.description, "Work with PDF files, forms and tables");
    }

    #[test]
    fn test_validate_all_scans_two_levels() {
        let root = TempDir::new().unwrap();
        let write = |rel: &str, content: &str| {
            let path = root.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        };
        write("docs/pdf/SKILL.md", GOOD);
        write("docs/broken/SKILL.md", "---\nname: broken\n---\n");
        write(".claude-plugin/hidden/SKILL.md", GOOD);
        write("a/b/too-deep/SKILL.md", GOOD);

        let results = validate_all(root.path());
        let paths: Vec<_> = results.iter().map(|r| r.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("docs/broken"), PathBuf::from("docs/pdf")]
        );
        assert!(!results[0].is_valid());
        assert!(results[1].is_valid());
    }
}
