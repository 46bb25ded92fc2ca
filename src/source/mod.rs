//! Source references
//!
//! Parses the `github_url` field of a config entry into a [`SourceRef`].
//!
//! Supported formats:
//! - `https://github.com/owner/repo` (optionally ending in `.git`)
//! - `https://github.com/owner/repo/tree/<ref>/<path>` - GitHub web UI URL
//! - `github:owner/repo` and `owner/repo`
//! - `file:///absolute/path`, `/absolute/path`, `./relative` or `../relative` -
//!   a local directory, used for offline mirrors

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::fetch::non_retryable;
use crate::error::FetchError;

/// GitHub web host, the default clone origin
pub const GITHUB_URL: &str = "https://github.com";

/// A GitHub repository, optionally pinned to a ref and narrowed to a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
    /// Branch, tag or SHA; `None` means the default branch
    pub git_ref: Option<String>,
    /// Repository prefix from a `/tree/<ref>/<path>` URL
    pub path: Option<String>,
}

impl GitHubRepo {
    /// Clone URL on `host`, normally [`GITHUB_URL`]
    pub fn clone_url(&self, host: &str) -> String {
        format!("{}/{}/{}.git", host.trim_end_matches('/'), self.owner, self.repo)
    }

    /// Join the URL prefix with an extraction path
    pub fn repo_path(&self, sub: Option<&str>) -> Option<String> {
        match (self.path.as_deref(), sub) {
            (Some(prefix), Some(sub)) => Some(format!("{}/{}", prefix, sub)),
            (Some(prefix), None) => Some(prefix.to_string()),
            (None, Some(sub)) => Some(sub.to_string()),
            (None, None) => None,
        }
    }
}

/// Where an entry's content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    GitHub(GitHubRepo),
    /// Local directory
    Dir { path: PathBuf },
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::GitHub(repo) => {
                write!(f, "{}/{}", repo.owner, repo.repo)?;
                if let Some(git_ref) = &repo.git_ref {
                    write!(f, "@{}", git_ref)?;
                }
                if let Some(path) = &repo.path {
                    write!(f, ":{}", path)?;
                }
                Ok(())
            }
            SourceRef::Dir { path } => write!(f, "{}", path.display()),
        }
    }
}

impl SourceRef {
    /// Parse a source reference; relative local paths resolve against `base`
    pub fn parse(input: &str, base: &Path) -> Result<Self, FetchError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(non_retryable(input, "empty source reference"));
        }

        if let Some(path) = input.strip_prefix("file://") {
            return Ok(SourceRef::Dir {
                path: PathBuf::from(path),
            });
        }
        if input.starts_with("./") || input.starts_with("../") || input == "." {
            return Ok(SourceRef::Dir {
                path: base.join(input),
            });
        }
        if Path::new(input).is_absolute() {
            return Ok(SourceRef::Dir {
                path: PathBuf::from(input),
            });
        }

        if let Some(rest) = input
            .strip_prefix("https://github.com/")
            .or_else(|| input.strip_prefix("http://github.com/"))
        {
            return parse_github_path(rest).ok_or_else(|| {
                non_retryable(input, "expected https://github.com/<owner>/<repo>")
            });
        }
        if let Some(rest) = input.strip_prefix("github:") {
            return parse_shorthand(rest)
                .ok_or_else(|| non_retryable(input, "expected github:<owner>/<repo>"));
        }
        if is_github_shorthand(input) {
            if let Some(source) = parse_shorthand(input) {
                return Ok(source);
            }
        }

        Err(non_retryable(
            input,
            "unsupported source; use a GitHub URL, owner/repo, or a local path",
        ))
    }
}

/// Check if string looks like a GitHub owner/repo shorthand
fn is_github_shorthand(input: &str) -> bool {
    !input.contains("://")
        && !input.starts_with("git@")
        && !input.starts_with('@')
        && !input.starts_with('/')
        && input.matches('/').count() == 1
}

fn parse_shorthand(input: &str) -> Option<SourceRef> {
    let (owner, repo) = input.split_once('/')?;
    let repo = repo.trim_end_matches(".git");
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some(SourceRef::GitHub(GitHubRepo {
        owner: owner.to_string(),
        repo: repo.to_string(),
        git_ref: None,
        path: None,
    }))
}

/// Parse `{owner}/{repo}[/tree/{ref}[/{path...}]]` after the host
fn parse_github_path(rest: &str) -> Option<SourceRef> {
    let parts: Vec<&str> = rest
        .trim_end_matches('/')
        .split('/')
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 2 {
        return None;
    }

    let owner = parts[0].to_string();
    let repo = parts[1].trim_end_matches(".git").to_string();

    let (git_ref, path) = match parts.get(2) {
        None => (None, None),
        Some(&"tree") | Some(&"blob") => {
            let git_ref = parts.get(3).map(|r| (*r).to_string());
            let path = (parts.len() > 4).then(|| parts[4..].join("/"));
            (git_ref, path)
        }
        Some(_) => return None,
    };

    Some(SourceRef::GitHub(GitHubRepo {
        owner,
        repo,
        git_ref,
        path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> SourceRef {
        SourceRef::parse(input, Path::new("/config")).unwrap()
    }

    fn github(owner: &str, repo: &str, git_ref: Option<&str>, path: Option<&str>) -> SourceRef {
        SourceRef::GitHub(GitHubRepo {
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref: git_ref.map(String::from),
            path: path.map(String::from),
        })
    }

    #[test]
    fn test_parse_plain_github_url() {
        assert_eq!(
            parse("https://github.com/smerchek/claude-epub-skill"),
            github("smerchek", "claude-epub-skill", None, None)
        );
        assert_eq!(
            parse("https://github.com/example/epub-tool.git"),
            github("example", "epub-tool", None, None)
        );
    }

    #[test]
    fn test_parse_github_tree_url() {
        assert_eq!(
            parse("https://github.com/obra/superpowers/tree/main/skills/brainstorming"),
            github(
                "obra",
                "superpowers",
                Some("main"),
                Some("skills/brainstorming")
            )
        );
        assert_eq!(
            parse("https://github.com/obra/superpowers/tree/v2"),
            github("obra", "superpowers", Some("v2"), None)
        );
    }

    #[test]
    fn test_parse_shorthands() {
        assert_eq!(parse("github:owner/repo"), github("owner", "repo", None, None));
        assert_eq!(parse("owner/repo"), github("owner", "repo", None, None));
    }

    #[test]
    fn test_parse_local_paths() {
        assert_eq!(
            parse("./mirror/epub"),
            SourceRef::Dir {
                path: PathBuf::from("/config/./mirror/epub")
            }
        );
        assert_eq!(
            parse("file:///srv/mirror"),
            SourceRef::Dir {
                path: PathBuf::from("/srv/mirror")
            }
        );
        assert_eq!(
            parse("/srv/mirror"),
            SourceRef::Dir {
                path: PathBuf::from("/srv/mirror")
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_formats() {
        for input in [
            "",
            "https://gitlab.com/a/b",
            "https://github.com/onlyowner",
            "https://github.com/a/b/issues/3",
            "not-a-source",
        ] {
            let err = SourceRef::parse(input, Path::new("/")).unwrap_err();
            assert!(!err.is_retryable(), "{input} should be non-retryable");
        }
    }

    #[test]
    fn test_repo_path_joins_prefix() {
        let SourceRef::GitHub(repo) = parse("https://github.com/o/r/tree/main/skills") else {
            panic!("expected github source");
        };
        assert_eq!(repo.repo_path(Some("pdf")), Some("skills/pdf".to_string()));
        assert_eq!(repo.repo_path(None), Some("skills".to_string()));
        assert_eq!(repo.clone_url(GITHUB_URL), "https://github.com/o/r.git");
        assert_eq!(repo.clone_url("/srv/mirror/"), "/srv/mirror/o/r.git");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            parse("https://github.com/o/r/tree/dev/skills").to_string(),
            "o/r@dev:skills"
        );
    }
}
