//! Error types for page retrieval.

use thiserror::Error;

/// Errors that can occur while fetching a page for link extraction.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL string could not be parsed or uses an unsupported scheme.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The request did not finish within the configured timeout.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} {reason} fetching {url}")]
    HttpStatus {
        /// The URL that returned the status.
        url: String,
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase, empty if unknown.
        reason: String,
    },

    /// The response declared a content type the extractor does not read.
    #[error("unsupported content type '{content_type}' at {url}")]
    UnsupportedContentType {
        /// The URL that was fetched.
        url: String,
        /// The declared `Content-Type`, or empty when absent.
        content_type: String,
    },

    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FetchError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
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

    /// Creates an unsupported content type error.
    pub fn unsupported_content_type(
        url: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self::UnsupportedContentType {
            url: url.into(),
            content_type: content_type.into(),
        }
    }
}
