//! GitHub releases API client.

use std::time::{Duration, UNIX_EPOCH};

use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::error::GithubError;
use super::repo::{RepoRef, parse_repo_url};
use crate::config::Config;
use crate::fetch::{MAX_CONTENT_SIZE, read_body_limited};
use crate::http::build_client;

/// Public GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Versioned media type requested from the API.
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// One entry of the releases listing. Only the fields used are decoded.
#[derive(Debug, Deserialize)]
pub(crate) struct Release {
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A file attached to a release.
#[derive(Debug, Deserialize)]
pub(crate) struct Asset {
    pub browser_download_url: String,
}

/// Resolves repository URLs to the download URLs of their release assets.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_base: String,
}

impl GithubClient {
    /// Creates a client for the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::ClientBuild`] if HTTP client construction fails.
    pub fn new(config: &Config) -> Result<Self, GithubError> {
        Self::with_api_base(config, DEFAULT_API_BASE)
    }

    /// Creates a client against a custom API root (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::ClientBuild`] if HTTP client construction fails.
    pub fn with_api_base(
        config: &Config,
        api_base: impl Into<String>,
    ) -> Result<Self, GithubError> {
        let client = build_client(config).map_err(GithubError::ClientBuild)?;
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Ok(Self { client, api_base })
    }

    /// The releases listing endpoint for `repo`.
    #[must_use]
    pub fn releases_endpoint(&self, repo: &RepoRef) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_base, repo.owner, repo.repo
        )
    }

    /// Returns every asset download URL across every release of the repository.
    ///
    /// Order follows the API: releases as listed, then assets within each.
    ///
    /// # Errors
    ///
    /// - [`GithubError::InvalidRepoUrl`] if `repo_url` names no owner/repo
    /// - [`GithubError::RateLimited`] when the API quota is exhausted
    /// - [`GithubError::HttpStatus`], [`GithubError::Network`],
    ///   [`GithubError::Timeout`] or [`GithubError::Decode`] when the request fails
    /// - [`GithubError::NoAssets`] when the request succeeds but yields nothing
    #[instrument(skip(self), fields(repo_url = %repo_url))]
    pub async fn release_assets(&self, repo_url: &str) -> Result<Vec<String>, GithubError> {
        let repo = parse_repo_url(repo_url)?;
        let releases = self.fetch_releases(&repo).await?;
        let assets = flatten_assets(releases);

        if assets.is_empty() {
            return Err(GithubError::NoAssets {
                owner: repo.owner,
                repo: repo.repo,
            });
        }

        info!(repo = %repo, count = assets.len(), "resolved release assets");
        Ok(assets)
    }

    async fn fetch_releases(&self, repo: &RepoRef) -> Result<Vec<Release>, GithubError> {
        let endpoint = self.releases_endpoint(repo);
        debug!(api_url = %endpoint, "calling GitHub releases API");

        let response = self
            .client
            .get(&endpoint)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await
            .map_err(|e| GithubError::from_transport(&endpoint, e))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN && is_rate_limited(response.headers()) {
            let reset = rate_limit_reset(response.headers());
            warn!(%reset, "GitHub API rate limit exhausted");
            return Err(GithubError::RateLimited { reset });
        }
        if !status.is_success() {
            return Err(GithubError::http_status(&endpoint, status));
        }

        let (body, truncated) = read_body_limited(response, MAX_CONTENT_SIZE)
            .await
            .map_err(|e| GithubError::from_transport(&endpoint, e))?;
        if truncated {
            warn!(
                limit_bytes = MAX_CONTENT_SIZE,
                "GitHub response exceeded size ceiling; truncated"
            );
        }

        serde_json::from_slice(&body).map_err(|source| GithubError::Decode {
            url: endpoint,
            source,
        })
    }
}

/// Flattens releases into asset download URLs, preserving release then asset order.
pub(crate) fn flatten_assets(releases: Vec<Release>) -> Vec<String> {
    releases
        .into_iter()
        .flat_map(|release| release.assets)
        .map(|asset| asset.browser_download_url)
        .collect()
}

fn is_rate_limited(headers: &HeaderMap) -> bool {
    headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0")
}

/// Formats the reset header (Unix seconds) as an HTTP date, or returns it verbatim.
fn rate_limit_reset(headers: &HeaderMap) -> String {
    let Some(raw) = headers.get(RATE_LIMIT_RESET).and_then(|v| v.to_str().ok()) else {
        return "unknown".to_string();
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) => httpdate::fmt_http_date(UNIX_EPOCH + Duration::from_secs(secs)),
        Err(_) => raw.to_string(),
    }
}
