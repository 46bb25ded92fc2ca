//! Parse YAML frontmatter from `SKILL.md`.

use serde_yaml::{Mapping, Value};

/// Split content into its YAML frontmatter mapping (between the first `---`
/// line and the next `---` line) and the body.
///
/// The error string explains what is wrong with the layout.
pub fn parse_frontmatter_and_body(content: &str) -> Result<(Mapping, String), String> {
    if content.trim().is_empty() {
        return Err("file is empty".to_string());
    }

    let lines: Vec<&str> = content.lines().collect();
    if lines[0].trim() != "---" {
        return Err("missing opening '---' line".to_string());
    }
    let end_idx = lines[1..]
        .iter()
        .position(|l| l.trim() == "---")
        .ok_or_else(|| "missing closing '---' line".to_string())?
        + 1;

    let frontmatter_str = lines[1..end_idx].join("\n");
    let body = lines[end_idx + 1..].join("\n");

    match serde_yaml::from_str::<Value>(&frontmatter_str) {
        Ok(Value::Mapping(mapping)) => Ok((mapping, body)),
        Ok(Value::Null) => Ok((Mapping::new(), body)),
        Ok(_) => Err("frontmatter is not a mapping".to_string()),
        Err(e) => Err(format!("invalid YAML: {}", e)),
    }
}

/// Get a scalar from the frontmatter as a string; blank strings count as absent.
pub fn get_str(mapping: &Mapping, key: &str) -> Option<String> {
    let v = mapping.get(Value::String(key.to_string()))?;
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}
