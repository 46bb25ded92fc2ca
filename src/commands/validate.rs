//! Validate command implementation
//!
//! Checks every skill directory in the vault without fetching anything.

use console::Style;
use std::path::PathBuf;

use crate::cli::ValidateArgs;
use crate::config::SourceConfig;
use crate::error::{IngestError, Result};
use crate::validate::{SkillValidation, validate_all};

/// Run validate command
pub fn run(args: ValidateArgs) -> Result<()> {
    let root = resolve_root(&args)?;
    if !root.is_dir() {
        return Err(IngestError::OutputDirMissing {
            path: root.display().to_string(),
        });
    }

    let results = validate_all(&root);
    print_results(&root, &results);

    let invalid = results.iter().filter(|r| !r.is_valid()).count();
    if invalid > 0 {
        return Err(IngestError::InvalidSkills { count: invalid });
    }
    Ok(())
}

/// `--dir` wins; otherwise the config's output directory
fn resolve_root(args: &ValidateArgs) -> Result<PathBuf> {
    match &args.dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(SourceConfig::load(&args.config.config)?.output_directory),
    }
}

fn print_results(root: &std::path::Path, results: &[SkillValidation]) {
    if results.is_empty() {
        println!("No skills found in {}.", root.display());
        return;
    }

    for result in results {
        let path = crate::path_utils::to_forward_slashes(&result.path);
        match &result.result {
            Ok(validated) => {
                println!(
                    "  {} {}",
                    Style::new().green().apply_to("ok"),
                    Style::new().bold().apply_to(&path)
                );
                for warning in &validated.warnings {
                    println!("    {} {}", Style::new().yellow().apply_to("warning:"), warning);
                }
            }
            Err(e) => {
                println!(
                    "  {} {}",
                    Style::new().red().apply_to("invalid"),
                    Style::new().bold().apply_to(&path)
                );
                println!("    {}", e);
            }
        }
    }

    let invalid = results.iter().filter(|r| !r.is_valid()).count();
    println!(
        "\n{} {} skill(s), {} valid, {} invalid",
        Style::new().bold().apply_to("Summary:"),
        results.len(),
        results.len() - invalid,
        invalid
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArg;
    use std::fs;
    use tempfile::TempDir;

    fn args_for(dir: &std::path::Path) -> ValidateArgs {
        ValidateArgs {
            dir: Some(dir.to_path_buf()),
            config: ConfigArg {
                config: PathBuf::from("does-not-exist.json"),
            },
        }
    }

    fn write_skill(root: &std::path::Path, rel: &str, content: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("SKILL.md"), content).unwrap();
    }

    #[test]
    fn test_validate_passes_for_valid_vault() {
        let temp = TempDir::new().unwrap();
        write_skill(
            temp.path(),
            "dev/pdf",
            "---\nname: pdf\ndescription: Work with PDF files in every way you need\n---\n# PDF\n",
        );
        assert!(run(args_for(temp.path())).is_ok());
    }

    #[test]
    fn test_validate_counts_invalid_skills() {
        let temp = TempDir::new().unwrap();
        write_skill(temp.path(), "dev/broken", "---\nname: broken\n---\nbody\n");
        write_skill(temp.path(), "dev/garbage", "no frontmatter here");

        let err = run(args_for(temp.path())).unwrap_err();
        assert!(matches!(err, IngestError::InvalidSkills { count: 2 }));
    }

    #[test]
    fn test_validate_missing_dir() {
        let temp = TempDir::new().unwrap();
        let err = run(args_for(&temp.path().join("nope"))).unwrap_err();
        assert!(matches!(err, IngestError::OutputDirMissing { .. }));
    }
}
