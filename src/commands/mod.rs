//! Command implementations for the skill-ingest CLI

pub mod completions;
pub mod fetch;
pub mod list;
pub mod validate;
