//! Git operations for the clone fallback
//!
//! This module handles:
//! - Cloning repositories over HTTPS (shallow when no ref is pinned)
//! - Resolving refs (branches, tags, SHAs) and checking them out
//! - Mapping libgit2 failures onto retryable and non-retryable [`FetchError`]s
//!
//! Authentication lives in [`auth`].

pub mod auth;

use std::path::Path;

use git2::{ErrorClass, FetchOptions, RemoteCallbacks, Repository, build::RepoBuilder};

use crate::error::FetchError;
use crate::error::fetch::{non_retryable, retryable};

/// Interpret a git2 error as a fetch error with a friendlier message
fn interpret_git_error(url: &str, err: &git2::Error) -> FetchError {
    let class = err.class();
    let message = err.message().to_lowercase();

    // Order matters - more specific patterns first
    if message.contains("not found") || message.contains("404") {
        non_retryable(url, "Repository not found")
    } else if message.contains("too many redirects") || message.contains("authentication replays") {
        // Usually a missing repository with auth being attempted
        non_retryable(url, "Repository not found")
    } else if message.contains("authentication") || message.contains("credentials") {
        non_retryable(url, "Authentication failed")
    } else if message.contains("permission denied") || message.contains("access denied") {
        non_retryable(url, "Permission denied")
    } else if message.contains("connection")
        || message.contains("network")
        || message.contains("timeout")
        || message.contains("timed out")
        || message.contains("429")
    {
        retryable(url, format!("Network error: {}", err.message()))
    } else if class == ErrorClass::Http || class == ErrorClass::Net {
        if message.contains("certificate") || message.contains("ssl") {
            non_retryable(url, format!("TLS error: {}", err.message()))
        } else {
            retryable(url, format!("HTTP error: {}", err.message()))
        }
    } else {
        non_retryable(url, err.message())
    }
}

/// Clone `url` into `target`, checked out at `git_ref` or the default branch.
///
/// Without a ref the clone is shallow (depth 1). A pinned ref needs history
/// to resolve tags and SHAs, so the clone is full and the ref is checked out
/// detached afterwards.
pub fn clone(url: &str, target: &Path, git_ref: Option<&str>) -> Result<Repository, FetchError> {
    let mut callbacks = RemoteCallbacks::new();
    auth::setup_auth_callbacks(&mut callbacks);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);
    if git_ref.is_none() {
        fetch_options.depth(1);
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    let repo = builder
        .clone(url, target)
        .map_err(|e| interpret_git_error(url, &e))?;

    if let Some(git_ref) = git_ref {
        let sha = resolve_reference(&repo, git_ref)
            .map_err(|reason| non_retryable(url, format!("ref '{}': {}", git_ref, reason)))?;
        checkout_commit(&repo, &sha)
            .map_err(|e| non_retryable(url, format!("checkout of {} failed: {}", sha, e.message())))?;
    }

    Ok(repo)
}

/// Resolve a reference name to a full commit SHA
fn resolve_reference(repo: &Repository, refname: &str) -> Result<String, String> {
    let ref_candidates = [
        refname.to_string(),
        format!("refs/heads/{}", refname),
        format!("refs/tags/{}", refname),
        format!("refs/remotes/origin/{}", refname),
    ];

    for candidate in &ref_candidates {
        if let Ok(reference) = repo.find_reference(candidate) {
            if let Ok(commit) = reference.peel_to_commit() {
                return Ok(commit.id().to_string());
            }
        }
    }

    // Revparse also covers SHA prefixes
    if let Ok(obj) = repo.revparse_single(refname) {
        if let Ok(commit) = obj.peel_to_commit() {
            return Ok(commit.id().to_string());
        }
    }

    Err("could not resolve reference".to_string())
}

/// Checkout a specific commit with a detached HEAD
fn checkout_commit(repo: &Repository, sha: &str) -> Result<(), git2::Error> {
    let oid = git2::Oid::from_str(sha)?;
    let commit = repo.find_commit(oid)?;
    repo.set_head_detached(commit.id())?;

    let mut checkout_builder = git2::build::CheckoutBuilder::new();
    checkout_builder.force();
    repo.checkout_head(Some(&mut checkout_builder))
}
