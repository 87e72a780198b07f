//! Error types for link extraction.

use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::FetchError;

/// Errors that abort a single extraction call.
///
/// Malformed hrefs inside an otherwise valid document are not errors; they
/// are reported through [`Extraction::malformed`](super::Extraction::malformed).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A document declared or sniffed as JSON did not parse.
    #[error("error parsing JSON: {source}")]
    Json {
        /// The underlying decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The input file exceeds the in-memory size ceiling.
    #[error(
        "file {} is too large ({size} bytes); maximum size is {limit} bytes (10 MB)",
        .path.display()
    )]
    FileTooLarge {
        /// The rejected file.
        path: PathBuf,
        /// Its size on disk.
        size: u64,
        /// The ceiling it exceeded.
        limit: u64,
    },

    /// The input file's first bytes match no supported document type.
    #[error(
        "unsupported file type: {} (expected HTML, XML, JSON or plain text)",
        .path.display()
    )]
    UnsupportedFileType {
        /// The rejected file.
        path: PathBuf,
    },

    /// The input file could not be inspected or read.
    #[error("error reading {}: {source}", .path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Creates a JSON parse error.
    pub fn json(source: serde_json::Error) -> Self {
        Self::Json { source }
    }

    /// Creates an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
