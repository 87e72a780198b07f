//! Error types for GitHub release resolution.

use thiserror::Error;

/// Errors returned while turning a repository URL into release-asset links.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The URL does not name an owner and a repository.
    #[error("invalid GitHub repository URL {url}: expected https://github.com/<owner>/<repo>")]
    InvalidRepoUrl {
        /// The rejected URL.
        url: String,
    },

    /// The API quota is exhausted (HTTP 403 with zero remaining requests).
    #[error("GitHub API rate limit exceeded. Reset at {reset}")]
    RateLimited {
        /// When the quota resets, as reported by the API.
        reset: String,
    },

    /// The API answered with a non-success status.
    #[error("GitHub API returned HTTP {status} {reason} for {url}")]
    HttpStatus {
        /// The API endpoint.
        url: String,
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase, empty if unknown.
        reason: String,
    },

    /// Network-level error reaching the API.
    #[error("network error fetching GitHub releases from {url}: {source}")]
    Network {
        /// The API endpoint.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The API request exceeded the configured timeout.
    #[error("timeout fetching GitHub releases from {url}")]
    Timeout {
        /// The API endpoint.
        url: String,
    },

    /// The API response was not the expected list of releases.
    #[error("error parsing GitHub response from {url}: {source}")]
    Decode {
        /// The API endpoint.
        url: String,
        /// The underlying decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The repository has no release assets at all.
    #[error("no release assets found for {owner}/{repo}")]
    NoAssets {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
    },

    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl GithubError {
    /// Creates an invalid repository URL error.
    pub fn invalid_repo_url(url: impl Into<String>) -> Self {
        Self::InvalidRepoUrl { url: url.into() }
    }

    /// Maps a transport error, distinguishing timeouts from other failures.
    pub fn from_transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}
