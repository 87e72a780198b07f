//! Error types for the download module.
//!
//! [`DownloadError`] describes why one file failed; [`BatchError`] is the
//! aggregate a batch returns once every item has been attempted.

use std::path::PathBuf;

use thiserror::Error;

use super::constants::MAX_DOWNLOAD_SIZE;

/// Errors that can occur while downloading a single file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} {reason} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Canonical reason phrase, empty if unknown.
        reason: String,
    },

    /// The resource is larger than the single-download ceiling.
    #[error(
        "file too large ({:.2} GB) at {url}; use a dedicated download tool instead",
        gigabytes(.size)
    )]
    TooLarge {
        /// The URL of the oversized resource.
        url: String,
        /// Declared or observed size in bytes.
        size: u64,
    },

    /// The target file exists and overwriting is disabled.
    #[error(
        "file {} already exists, skipping download (use --overwrite to replace it)",
        .path.display()
    )]
    AlreadyExists {
        /// The existing file.
        path: PathBuf,
    },

    /// File system error during download (create file, write, etc.)
    #[error("IO error writing to {}: {source}", .path.display())]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

#[allow(clippy::cast_precision_loss, clippy::trivially_copy_pass_by_ref)] // display only
fn gigabytes(bytes: &u64) -> f64 {
    *bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

impl DownloadError {
    /// Maps a transport error, distinguishing timeouts from other failures.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
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

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an already-exists error.
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Rejects a declared content length above [`MAX_DOWNLOAD_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::TooLarge`] when `content_length` exceeds the ceiling.
    /// An unknown length is accepted.
    pub fn check_content_length(
        url: impl Into<String>,
        content_length: Option<u64>,
    ) -> Result<(), Self> {
        match content_length {
            Some(size) if size > MAX_DOWNLOAD_SIZE => Err(Self::TooLarge {
                url: url.into(),
                size,
            }),
            _ => Ok(()),
        }
    }
}

/// Aggregate outcome of a batch that did not fully succeed.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The batch was given no URLs.
    #[error("no URLs to download")]
    Empty,

    /// One or more items failed; the rest were still attempted.
    #[error("{failed}/{total} downloads failed: {}", .messages.join("; "))]
    Failed {
        /// Number of items that did not produce a file.
        failed: usize,
        /// Number of items in the batch.
        total: usize,
        /// One message per failed item.
        messages: Vec<String>,
    },

    /// The sequential batch deadline passed before every item was attempted.
    #[error("download operation timed out after {completed}/{total} files")]
    TimedOut {
        /// Items attempted before the deadline.
        completed: usize,
        /// Number of items in the batch.
        total: usize,
    },
}
