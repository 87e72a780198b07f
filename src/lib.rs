//! lsweb Core Library
//!
//! This library lists and downloads the files linked from a web page, a
//! local file, or a GitHub repository's release assets.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Run-wide network and download policy
//! - [`fetch`] - Bounded, timeout-governed page retrieval
//! - [`extract`] - Link extraction from HTML, JSON and plain text
//! - [`github`] - Release-asset resolution through the GitHub API
//! - [`download`] - Sequential and bounded-concurrency download engine
//! - [`source`] - Input sources behind one trait
//! - [`output`] - Link-list formatters

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod extract;
pub mod fetch;
pub mod github;
mod http;
pub mod output;
pub mod source;
mod user_agent;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use download::{
    BatchError, DownloadClient, DownloadEngine, DownloadError, DownloadStats, JobOutcome,
    ProgressDisplay,
};
pub use extract::{
    ExtractError, Extraction, extract, extract_links_from_file, extract_links_from_url,
    filter_links, limit_links,
};
pub use fetch::{ContentKind, FetchError, FetchedPage, Fetcher};
pub use github::{GithubClient, GithubError, RepoRef, parse_repo_url};
pub use output::{OutputFormat, render_links};
pub use source::{LinkSource, SourceError, SourceSpec, build_source};
