//! A single ingestion target from the Source Config

use serde::Deserialize;

/// Default names skipped while copying fetched content
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[".git", ".github", "__pycache__", "*.pyc"];

/// How the upstream repository is organised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoType {
    /// The whole repository is one skill
    #[default]
    Standalone,
    /// The repository hosts several skills in subdirectories
    MultiSkill,
}

/// Which part of the fetched tree becomes the entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    FullRepo,
    /// A single directory, usually one segment deep
    Subfolder { path: String },
    /// An explicit multi-level path; every segment must exist
    DeepNested { path: String },
}

impl Extraction {
    /// Path inside the repository to extract, `None` for the whole tree
    pub fn path(&self) -> Option<&str> {
        match self {
            Extraction::FullRepo => None,
            Extraction::Subfolder { path } | Extraction::DeepNested { path } => Some(path),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        match self {
            Extraction::FullRepo => "full_repo",
            Extraction::Subfolder { .. } => "subfolder",
            Extraction::DeepNested { .. } => "deep_nested",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StrategyKind {
    FullRepo,
    Subfolder,
    DeepNested,
}

#[derive(Debug, Deserialize)]
struct RawExtractionConfig {
    strategy: StrategyKind,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    exclude_patterns: Option<Vec<String>>,
}

/// `extraction_config` of an entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawExtractionConfig")]
pub struct ExtractionConfig {
    pub extraction: Extraction,
    pub exclude_patterns: Vec<String>,
}

impl TryFrom<RawExtractionConfig> for ExtractionConfig {
    type Error = String;

    fn try_from(raw: RawExtractionConfig) -> Result<Self, Self::Error> {
        let path = raw
            .path
            .map(|p| p.trim().trim_matches('/').to_string())
            .filter(|p| !p.is_empty());

        let extraction = match (raw.strategy, path) {
            (StrategyKind::FullRepo, _) => Extraction::FullRepo,
            (StrategyKind::Subfolder, Some(path)) => Extraction::Subfolder { path },
            (StrategyKind::DeepNested, Some(path)) => Extraction::DeepNested { path },
            (StrategyKind::Subfolder, None) => {
                return Err("strategy 'subfolder' requires a non-empty 'path'".to_string());
            }
            (StrategyKind::DeepNested, None) => {
                return Err("strategy 'deep_nested' requires a non-empty 'path'".to_string());
            }
        };

        let exclude_patterns = raw.exclude_patterns.unwrap_or_else(|| {
            DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect()
        });

        Ok(Self {
            extraction,
            exclude_patterns,
        })
    }
}

/// One configured external content source
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    pub id: String,
    pub github_url: String,
    #[serde(default)]
    pub repo_type: RepoType,
    pub target_folder: String,
    pub category: String,
    pub extraction_config: ExtractionConfig,
    /// Informational only; the registry takes its description from SKILL.md
    #[serde(default)]
    pub description: Option<String>,
}

impl SourceEntry {
    /// Registry `source` value for this entry
    pub fn registry_source(&self) -> String {
        format!("./{}", self.target_folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ExtractionConfig, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_full_repo_ignores_path() {
        let config = parse(r#"{"strategy": "full_repo", "path": "ignored"}"#).unwrap();
        assert_eq!(config.extraction, Extraction::FullRepo);
        assert_eq!(config.extraction.path(), None);
    }

    #[test]
    fn test_subfolder_requires_path() {
        let err = parse(r#"{"strategy": "subfolder"}"#).unwrap_err();
        assert!(err.to_string().contains("requires a non-empty 'path'"));

        let err = parse(r#"{"strategy": "deep_nested", "path": "  "}"#).unwrap_err();
        assert!(err.to_string().contains("deep_nested"));
    }

    #[test]
    fn test_path_is_trimmed() {
        let config = parse(r#"{"strategy": "subfolder", "path": "/skill/"}"#).unwrap();
        assert_eq!(
            config.extraction,
            Extraction::Subfolder {
                path: "skill".to_string()
            }
        );
    }

    #[test]
    fn test_default_exclude_patterns() {
        let config = parse(r#"{"strategy": "full_repo"}"#).unwrap();
        assert_eq!(config.exclude_patterns, DEFAULT_EXCLUDE_PATTERNS);

        let config =
            parse(r#"{"strategy": "full_repo", "exclude_patterns": ["*.log"]}"#).unwrap();
        assert_eq!(config.exclude_patterns, vec!["*.log".to_string()]);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(parse(r#"{"strategy": "sparse"}"#).is_err());
    }

    #[test]
    fn test_entry_registry_source() {
        let entry: SourceEntry = serde_json::from_str(
            r#"{
                "id": "markdown-to-epub-converter",
                "github_url": "https://github.com/example/epub-tool",
                "repo_type": "standalone",
                "target_folder": "document-processing/markdown-to-epub-converter",
                "category": "document-processing",
                "extraction_config": {"strategy": "subfolder", "path": "skill"}
            }"#,
        )
        .unwrap();
        assert_eq!(
            entry.registry_source(),
            "./document-processing/markdown-to-epub-converter"
        );
        assert_eq!(entry.repo_type, RepoType::Standalone);
    }
}
