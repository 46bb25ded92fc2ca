//! GitHub fetcher
//!
//! Downloads only the subtree an entry needs through the Contents API:
//!
//! 1. `GET /repos/{owner}/{repo}` for the default branch (and to confirm the
//!    repository exists)
//! 2. `GET /repos/{owner}/{repo}/contents/{path}?ref={ref}`, walked
//!    recursively; files come from each item's `download_url`
//!
//! Whole-repository entries, and API failures that stay transient after
//! retries (rate limits, outages), go through a `git2` clone instead.

use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{ContentFetcher, FetchHint, RetryPolicy, StagedContent};
use crate::common::fs::remove_dir_if_exists;
use crate::error::FetchError;
use crate::error::fetch::{non_retryable, retryable};
use crate::git;
use crate::path_utils::normalize_relative;
use crate::source::{GITHUB_URL, GitHubRepo, SourceRef};

/// GitHub REST API root
pub const GITHUB_API_URL: &str = "https://api.github.com";

const CLIENT_USER_AGENT: &str = concat!("skill-ingest/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct RepoMetadata {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Dir(Vec<ContentItem>),
    File(ContentItem),
}

/// Map a non-success HTTP status onto a fetch error.
///
/// 429, 5xx, and 403 with an exhausted rate limit are transient; everything
/// else fails immediately.
pub(crate) fn classify_status(source: &str, status: StatusCode, headers: &HeaderMap) -> FetchError {
    let rate_limited = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");

    match status.as_u16() {
        429 => retryable(source, "HTTP 429: too many requests"),
        403 if rate_limited => retryable(source, "HTTP 403: API rate limit exceeded"),
        code @ 500..=599 => retryable(source, format!("HTTP {}: server error", code)),
        404 => non_retryable(source, "HTTP 404: not found"),
        401 => non_retryable(source, "HTTP 401: bad credentials (check GITHUB_TOKEN)"),
        _ => non_retryable(source, format!("HTTP {}", status)),
    }
}

fn network_error(source: &str, err: &reqwest::Error) -> FetchError {
    if err.is_builder() {
        non_retryable(source, err.to_string())
    } else {
        retryable(source, format!("network error: {}", err))
    }
}

/// Fetches from GitHub over HTTPS
pub struct GitHubFetcher {
    client: Client,
    api_base: String,
    clone_base: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl GitHubFetcher {
    pub fn new(retry: RetryPolicy) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| non_retryable("github", format!("HTTP client: {}", e)))?;

        let token = git::auth::github_token();
        if token.is_none() {
            debug!("GITHUB_TOKEN not set, using unauthenticated GitHub API access");
        }

        Ok(Self {
            client,
            api_base: GITHUB_API_URL.to_string(),
            clone_base: GITHUB_URL.to_string(),
            token,
            retry,
        })
    }

    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    #[cfg(test)]
    pub fn with_clone_base(mut self, clone_base: impl Into<String>) -> Self {
        self.clone_base = clone_base.into();
        self
    }

    fn request(&self, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .get(url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, "application/vnd.github+json");
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("token {}", token)),
            None => builder,
        }
    }

    /// One GET; non-success statuses become fetch errors
    fn get(&self, source: &str, url: Url) -> Result<Response, FetchError> {
        let response = self
            .request(url)
            .send()
            .map_err(|e| network_error(source, &e))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(classify_status(source, response.status(), response.headers()))
        }
    }

    fn get_json<T: DeserializeOwned>(&self, source: &str, url: &Url) -> Result<T, FetchError> {
        self.retry.run(source, || {
            self.get(source, url.clone())?
                .json::<T>()
                .map_err(|e| non_retryable(source, format!("malformed API response: {}", e)))
        })
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| non_retryable(&self.api_base, e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| non_retryable(&self.api_base, "API base cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn default_branch(&self, repo: &GitHubRepo, source: &str) -> Result<String, FetchError> {
        let url = self.api_url(&["repos", &repo.owner, &repo.repo])?;
        let metadata: RepoMetadata = self.get_json(source, &url)?;
        Ok(metadata.default_branch)
    }

    fn contents_url(&self, repo: &GitHubRepo, path: &str, git_ref: &str) -> Result<Url, FetchError> {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        let mut url = self.api_url(&segments)?;
        url.query_pairs_mut().append_pair("ref", git_ref);
        Ok(url)
    }

    fn download_file(&self, source: &str, url: &str, dest: &Path) -> Result<(), FetchError> {
        let url = Url::parse(url).map_err(|e| non_retryable(source, format!("bad download URL: {}", e)))?;
        let bytes = self.retry.run(source, || {
            self.get(source, url.clone())?
                .bytes()
                .map_err(|e| network_error(source, &e))
        })?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| non_retryable(source, e.to_string()))?;
        }
        fs::write(dest, &bytes).map_err(|e| non_retryable(source, e.to_string()))
    }

    /// Download `path` recursively into `root`, returning the file count.
    ///
    /// A missing top-level path stages nothing so the extractor can name the
    /// segment that does not exist.
    fn download_path(
        &self,
        repo: &GitHubRepo,
        git_ref: &str,
        path: &str,
        root: &Path,
        source: &str,
        top_level: bool,
    ) -> Result<usize, FetchError> {
        let url = self.contents_url(repo, path, git_ref)?;
        let response = match self.get_json::<ContentsResponse>(source, &url) {
            Ok(response) => response,
            Err(FetchError::NonRetryable { reason, .. })
                if top_level && reason.starts_with("HTTP 404") =>
            {
                debug!(source, path, "path not present upstream");
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let items = match response {
            ContentsResponse::Dir(items) => items,
            ContentsResponse::File(item) => vec![item],
        };

        let mut count = 0;
        for item in items {
            let relative = normalize_relative(&item.path).ok_or_else(|| {
                non_retryable(source, format!("unsafe path in API response: {}", item.path))
            })?;

            match item.kind.as_str() {
                "file" => {
                    let download_url = item.download_url.as_deref().ok_or_else(|| {
                        non_retryable(source, format!("no download_url for {}", item.path))
                    })?;
                    self.download_file(source, download_url, &root.join(&relative))?;
                    count += 1;
                }
                "dir" => {
                    count += self.download_path(repo, git_ref, &relative, root, source, false)?;
                }
                other => debug!(source, path = %item.path, kind = other, "skipping"),
            }
        }
        Ok(count)
    }

    fn fetch_via_api(&self, repo: &GitHubRepo, path: &str, source: &str) -> Result<StagedContent, FetchError> {
        let git_ref = match &repo.git_ref {
            Some(git_ref) => {
                // Confirms the repository exists before a contents 404 is read as a missing path
                self.default_branch(repo, source)?;
                git_ref.clone()
            }
            None => self.default_branch(repo, source)?,
        };

        let mut staged = StagedContent::create(source)?;
        let files = self.download_path(repo, &git_ref, path, staged.root(), source, true)?;
        info!(source, git_ref = %git_ref, path, files, "downloaded via GitHub API");

        if let Some(prefix) = &repo.path {
            staged.narrow(prefix);
        }
        Ok(staged)
    }

    fn fetch_via_clone(&self, repo: &GitHubRepo, source: &str) -> Result<StagedContent, FetchError> {
        let mut staged = StagedContent::create(source)?;
        let url = repo.clone_url(&self.clone_base);
        let root = staged.root().to_path_buf();

        self.retry.run(source, || {
            remove_dir_if_exists(&root).map_err(|e| non_retryable(source, e.to_string()))?;
            git::clone(&url, &root, repo.git_ref.as_deref()).map(drop)
        })?;
        remove_dir_if_exists(&root.join(".git")).map_err(|e| non_retryable(source, e.to_string()))?;
        info!(source, "cloned repository");

        if let Some(prefix) = &repo.path {
            staged.narrow(prefix);
        }
        Ok(staged)
    }
}

impl ContentFetcher for GitHubFetcher {
    fn fetch(&self, source: &SourceRef, hint: FetchHint<'_>) -> Result<StagedContent, FetchError> {
        let SourceRef::GitHub(repo) = source else {
            return Err(non_retryable(source.to_string(), "not a GitHub source"));
        };
        let label = source.to_string();

        let Some(path) = hint.path.and_then(|p| repo.repo_path(Some(p))) else {
            return self.fetch_via_clone(repo, &label);
        };

        match self.fetch_via_api(repo, &path, &label) {
            Err(e) if e.is_retryable() => {
                warn!(source = %label, error = %e, "GitHub API unavailable, falling back to git clone");
                self.fetch_via_clone(repo, &label)
            }
            result => result,
        }
    }
}
