//! Registry (marketplace.json) errors

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum MergeError {
    #[error("Failed to read registry {path}: {reason}")]
    #[diagnostic(
        code(skill_ingest::registry::unreadable),
        help("Check marketplace_path in the config, or run with --no-marketplace")
    )]
    Unreadable { path: String, reason: String },

    #[error("Registry does not match the marketplace schema: {message}")]
    #[diagnostic(code(skill_ingest::registry::schema_invalid))]
    SchemaInvalid { message: String },

    #[error("Failed to write registry {path}: {reason}")]
    #[diagnostic(
        code(skill_ingest::registry::write_failed),
        help("The previous registry file was left untouched")
    )]
    WriteFailed { path: String, reason: String },
}

/// Creates a write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> MergeError {
    MergeError::WriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a schema error
pub fn schema_invalid(message: impl Into<String>) -> MergeError {
    MergeError::SchemaInvalid {
        message: message.into(),
    }
}
