//! Git authentication configuration
//!
//! HTTPS credentials come from, in order:
//! - `GITHUB_TOKEN` for github.com URLs
//! - Git credential helpers
//! - Anonymous access for public repositories

use std::env;

use git2::{Cred, CredentialType, Error, ErrorClass, RemoteCallbacks};

/// Environment variable holding a GitHub token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Token from the environment, ignoring empty values
pub fn github_token() -> Option<String> {
    env::var(GITHUB_TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn auth_failed() -> Error {
    Error::new(
        git2::ErrorCode::Auth,
        ErrorClass::Http,
        "authentication failed",
    )
}

fn try_user_pass_credentials(
    url: &str,
    username_from_url: Option<&str>,
) -> std::result::Result<Cred, git2::Error> {
    if url.contains("github.com") {
        if let Some(token) = github_token() {
            return Cred::userpass_plaintext("x-access-token", &token);
        }
    }

    if let Ok(config) = git2::Config::open_default() {
        if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
            return Ok(cred);
        }
    }

    // Lets the server answer with its real error for public repositories
    Cred::userpass_plaintext(username_from_url.unwrap_or(""), "").map_err(|_| auth_failed())
}

/// Set up authentication callbacks for git operations
pub fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks) {
    callbacks.credentials(|url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return try_user_pass_credentials(url, username_from_url);
        }
        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }
        Err(auth_failed())
    });
}
