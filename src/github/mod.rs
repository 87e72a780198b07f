//! GitHub release-asset resolution.
//!
//! Turns a repository web URL such as `https://github.com/owner/repo` into
//! the flat list of browser download URLs for every asset of every release.
//! An empty result is reported as [`GithubError::NoAssets`] so callers can
//! tell "nothing to download" apart from a failed request.

mod client;
mod error;
mod repo;

pub use client::{DEFAULT_API_BASE, GithubClient};
pub use error::GithubError;
pub use repo::{RepoRef, parse_repo_url};
