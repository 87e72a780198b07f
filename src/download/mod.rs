//! HTTP download engine for streaming files to disk.
//!
//! This module downloads the links an extraction produced, either one at a
//! time or in parallel under a concurrency ceiling.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Filenames from the URL's last path segment, sanitized, with a fallback
//! - A 1 GB ceiling on declared content length
//! - Fail-fast on existing files (sequential) or numeric-suffix renaming (concurrent)
//! - Partial files removed on any failure
//! - Per-item error isolation with an aggregate [`BatchError`]
//!
//! # Example
//!
//! ```no_run
//! use lsweb_core::Config;
//! use lsweb_core::download::DownloadEngine;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(&Config::default(), "./downloads")?;
//! let stats = engine
//!     .download_all(&["https://example.com/release.zip".to_string()], true)
//!     .await?;
//! println!("Downloaded: {}", stats.completed());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod filename;
mod progress;

pub use client::DownloadClient;
pub use constants::{FALLBACK_FILENAME, MAX_DOWNLOAD_SIZE};
pub use engine::{DownloadEngine, DownloadStats, JobOutcome};
pub use error::{BatchError, DownloadError};
pub use filename::filename_from_url;
pub use progress::ProgressDisplay;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
