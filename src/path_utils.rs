//! Path helpers shared by config validation, extraction and the registry
//!
//! Destinations and extraction paths come from a hand-edited config file, so
//! every relative path is normalized here before it touches the filesystem.

use std::path::{Component, Path};

/// Render a path with forward slashes regardless of platform.
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Normalize a relative path that must stay inside a managed root.
///
/// Strips `.` components, leading `./` and trailing slashes. Returns `None`
/// for empty paths, absolute paths, and paths with `..` components.
///
/// ```ignore
/// assert_eq!(normalize_relative("./docs/pdf/"), Some("docs/pdf".to_string()));
/// assert_eq!(normalize_relative("../escape"), None);
/// ```
pub fn normalize_relative(raw: &str) -> Option<String> {
    let unified = raw.trim().replace('\\', "/");
    let mut segments = Vec::new();

    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().to_string()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Convert a display name into kebab-case.
///
/// Lowercases, turns spaces and underscores into hyphens, drops everything
/// that is not `[a-z0-9-]`, and collapses repeated hyphens.
///
/// "Markdown to EPUB Converter" becomes "markdown-to-epub-converter" and
/// "D3.js Visualization" becomes "d3js-visualization".
pub fn to_kebab_case(name: &str) -> String {
    let mapped: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    mapped
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
