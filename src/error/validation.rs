//! Descriptor validation errors

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ValidationError {
    #[error("SKILL.md not found in {path}")]
    #[diagnostic(
        code(skill_ingest::validate::descriptor_missing),
        help("Every skill needs a SKILL.md at its root")
    )]
    DescriptorMissing { path: String },

    #[error("Failed to parse SKILL.md frontmatter in {path}: {reason}")]
    #[diagnostic(
        code(skill_ingest::validate::parse_failure),
        help("SKILL.md must start with a YAML mapping between two '---' lines")
    )]
    ParseFailure { path: String, reason: String },

    #[error("SKILL.md in {path} is missing required field '{field}'")]
    #[diagnostic(code(skill_ingest::validate::missing_field))]
    MissingField { path: String, field: String },

    #[error("Invalid skill name '{name}'")]
    #[diagnostic(
        code(skill_ingest::validate::invalid_name),
        help("Use letters, digits, '-', '_' or '.', for example '{suggestion}'")
    )]
    InvalidName { name: String, suggestion: String },
}

/// Creates a missing field error
pub fn missing_field(path: impl Into<String>, field: impl Into<String>) -> ValidationError {
    ValidationError::MissingField {
        path: path.into(),
        field: field.into(),
    }
}

/// Creates a parse failure error
pub fn parse_failure(path: impl Into<String>, reason: impl Into<String>) -> ValidationError {
    ValidationError::ParseFailure {
        path: path.into(),
        reason: reason.into(),
    }
}
