//! Common test utilities for skill-ingest integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// Empty registry the vault starts with
pub const EMPTY_MARKETPLACE: &str = r#"{
  "name": "test-vault",
  "version": "1.0.0",
  "description": "Skills vault used by integration tests",
  "owner": {
    "name": "Test Owner",
    "email": "owner@example.com"
  },
  "plugins": []
}
"#;

/// A temporary vault plus local "upstream" repositories to ingest from
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root; the config and the vault live here
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace with an empty registry
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let workspace = Self { temp, path };
        workspace.write_file(".claude-plugin/marketplace.json", EMPTY_MARKETPLACE);
        workspace
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Write a `SKILL.md` with the given frontmatter name and description
    pub fn write_skill(&self, dir: &str, name: &str, description: &str) {
        self.write_file(
            &format!("{}/SKILL.md", dir),
            &format!(
                "---\nname: {}\ndescription: {}\n---\n\n# {}\n\nInstructions for this skill.\n",
                name, description, name
            ),
        );
    }

    /// Write the Source Config at the default location
    pub fn write_config(&self, skills_json: &str) {
        self.write_file(
            "external_skills_config.json",
            &format!("{{\n  \"skills\": {}\n}}\n", skills_json),
        );
    }

    /// Parsed registry document
    pub fn marketplace(&self) -> serde_json::Value {
        serde_json::from_str(&self.read_file(".claude-plugin/marketplace.json"))
            .expect("Failed to parse marketplace.json")
    }

    /// Names of the registered plugins, in registry order
    pub fn plugin_names(&self) -> Vec<String> {
        self.marketplace()["plugins"]
            .as_array()
            .expect("plugins must be an array")
            .iter()
            .map(|p| p["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// Get path to skill-ingest binary
    pub fn skill_ingest_bin() -> PathBuf {
        PathBuf::from(env!("CARGO_BIN_EXE_skill-ingest"))
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry JSON for a local upstream directory
#[allow(dead_code)]
pub fn entry_json(id: &str, upstream: &str, target: &str, category: &str, strategy: &str) -> String {
    let extraction = match strategy.split_once(':') {
        Some((kind, path)) => format!(r#"{{"strategy": "{}", "path": "{}"}}"#, kind, path),
        None => format!(r#"{{"strategy": "{}"}}"#, strategy),
    };
    format!(
        r#"{{
      "id": "{}",
      "github_url": "{}",
      "target_folder": "{}",
      "category": "{}",
      "extraction_config": {}
    }}"#,
        id, upstream, target, category, extraction
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.path.exists());
        assert!(workspace.plugin_names().is_empty());
    }

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("test/file.txt", "hello");
        assert!(workspace.file_exists("test/file.txt"));
        assert_eq!(workspace.read_file("test/file.txt"), "hello");
    }
}
