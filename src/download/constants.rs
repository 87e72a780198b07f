//! Constants for the download module (size ceiling, filename fallback).

/// Largest declared `Content-Length` accepted for a single download (~1 GB).
pub const MAX_DOWNLOAD_SIZE: u64 = 1024 * 1024 * 1000;

/// Filename used when a URL's path has no usable final segment.
pub const FALLBACK_FILENAME: &str = "download";

/// Highest numeric suffix tried when reserving a collision-free filename.
pub const MAX_NAME_SUFFIX: usize = 10_000;
