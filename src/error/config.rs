//! Source Config errors
//!
//! Every variant is fatal to a run: nothing can be ingested without a valid
//! config.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(
        code(skill_ingest::config::unreadable),
        help("Pass --config <path> or set SKILL_INGEST_CONFIG")
    )]
    Unreadable { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(skill_ingest::config::malformed))]
    Malformed { message: String },

    #[error("Duplicate entry id '{id}' in configuration")]
    #[diagnostic(
        code(skill_ingest::config::duplicate_id),
        help("Entry ids are registry keys and must be unique")
    )]
    DuplicateId { id: String },

    #[error("Entries '{first}' and '{second}' share target folder '{target}'")]
    #[diagnostic(
        code(skill_ingest::config::duplicate_target),
        help("Give each entry its own target_folder so one cannot overwrite the other")
    )]
    DuplicateTarget {
        target: String,
        first: String,
        second: String,
    },

    #[error("Target folder '{inner}' of '{second}' is nested inside '{outer}' of '{first}'")]
    #[diagnostic(
        code(skill_ingest::config::nested_target),
        help("Installing the outer entry replaces its whole folder, including the inner one")
    )]
    NestedTarget {
        outer: String,
        inner: String,
        first: String,
        second: String,
    },

    #[error("Target folder '{target}' of '{id}' overlaps the registry directory '{registry}'")]
    #[diagnostic(
        code(skill_ingest::config::registry_overlap),
        help("Move the entry or set `marketplace_path` outside every target_folder")
    )]
    RegistryOverlap {
        target: String,
        id: String,
        registry: String,
    },

    #[error("No entry with id '{id}' in configuration")]
    #[diagnostic(code(skill_ingest::config::unknown_entry))]
    UnknownEntry { id: String },
}

/// Creates a config unreadable error
pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Unreadable {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a malformed config error
pub fn malformed(message: impl Into<String>) -> ConfigError {
    ConfigError::Malformed {
        message: message.into(),
    }
}
