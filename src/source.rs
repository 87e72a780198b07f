//! Input sources that produce a link list.
//!
//! A run reads links from exactly one place: a web page, a local file, or a
//! GitHub repository's releases. Each is a [`LinkSource`] so the caller can
//! hold any of them as `Box<dyn LinkSource>`.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;

use crate::config::Config;
use crate::extract::{ExtractError, Extraction, extract_links_from_file, extract_links_from_url};
use crate::fetch::{FetchError, Fetcher};
use crate::github::{GithubClient, GithubError};

/// Errors from any link source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Page or file extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The page fetcher could not be created.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Release resolution failed.
    #[error(transparent)]
    Github(#[from] GithubError),
}

/// Where a run's links come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Links on an HTML, JSON or XML page.
    WebPage(String),
    /// Links in a local HTML, JSON or text file.
    LocalFile(PathBuf),
    /// Asset URLs of every release of a GitHub repository.
    GithubReleases(String),
}

/// Something that yields a list of links.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via `Box<dyn LinkSource>`.
/// Rust 2024 native async traits are not object-safe.
#[async_trait]
pub trait LinkSource: Send + Sync {
    /// Short name for logs (e.g. "web", "file", "github").
    fn name(&self) -> &'static str;

    /// The URL or path being read.
    fn location(&self) -> String;

    /// Produces the links.
    async fn links(&self) -> Result<Extraction, SourceError>;
}

/// Links on a fetched page.
#[derive(Debug, Clone)]
pub struct WebPageSource {
    fetcher: Fetcher,
    url: String,
}

impl WebPageSource {
    /// Creates a source for `url` using `fetcher`.
    #[must_use]
    pub fn new(fetcher: Fetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait]
impl LinkSource for WebPageSource {
    fn name(&self) -> &'static str {
        "web"
    }

    fn location(&self) -> String {
        self.url.clone()
    }

    async fn links(&self) -> Result<Extraction, SourceError> {
        Ok(extract_links_from_url(&self.fetcher, &self.url).await?)
    }
}

/// Links in a local file.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    /// Creates a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LinkSource for LocalFileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn links(&self) -> Result<Extraction, SourceError> {
        Ok(extract_links_from_file(&self.path).await?)
    }
}

/// Release-asset URLs of a GitHub repository.
#[derive(Debug, Clone)]
pub struct GithubReleaseSource {
    client: GithubClient,
    repo_url: String,
}

impl GithubReleaseSource {
    /// Creates a source for the repository at `repo_url`.
    #[must_use]
    pub fn new(client: GithubClient, repo_url: impl Into<String>) -> Self {
        Self {
            client,
            repo_url: repo_url.into(),
        }
    }
}

#[async_trait]
impl LinkSource for GithubReleaseSource {
    fn name(&self) -> &'static str {
        "github"
    }

    fn location(&self) -> String {
        self.repo_url.clone()
    }

    async fn links(&self) -> Result<Extraction, SourceError> {
        let links = self.client.release_assets(&self.repo_url).await?;
        Ok(Extraction {
            links,
            malformed: Vec::new(),
        })
    }
}

/// Builds the source described by `spec` with `config`'s network policy.
///
/// # Errors
///
/// Returns [`SourceError`] if the underlying HTTP client cannot be built.
#[instrument(level = "debug", skip(config))]
pub fn build_source(spec: SourceSpec, config: &Config) -> Result<Box<dyn LinkSource>, SourceError> {
    Ok(match spec {
        SourceSpec::WebPage(url) => Box::new(WebPageSource::new(Fetcher::new(config)?, url)),
        SourceSpec::LocalFile(path) => Box::new(LocalFileSource::new(path)),
        SourceSpec::GithubReleases(repo_url) => {
            Box::new(GithubReleaseSource::new(GithubClient::new(config)?, repo_url))
        }
    })
}
