//! Link extraction from HTML, JSON and plain-text content.
//!
//! Every branch produces absolute URL strings, deduplicated by exact string
//! equality with the first occurrence winning. The HTML branch additionally
//! reports hrefs it could not parse; those are warnings, never failures.
//!
//! # Example
//!
//! ```
//! use lsweb_core::extract::extract;
//! use lsweb_core::fetch::ContentKind;
//! use url::Url;
//!
//! let base = Url::parse("https://example.com/").unwrap();
//! let html = br#"<a href="page3">3</a><a href="mailto:me@example.com">mail</a>"#;
//! let extraction = extract(html, ContentKind::Html, &base).unwrap();
//! assert_eq!(extraction.links, vec!["https://example.com/page3"]);
//! ```

mod error;
mod file;
mod filter;
mod html;
mod json;
mod text;

use std::collections::HashSet;

use tracing::{instrument, warn};
use url::Url;

use crate::fetch::{ContentKind, Fetcher};

pub use error::ExtractError;
pub use file::extract_links_from_file;
pub use filter::{filter_links, limit_links};

/// Result of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Absolute links in first-seen order, without duplicates.
    pub links: Vec<String>,
    /// Raw href values that could not be parsed as URLs.
    pub malformed: Vec<String>,
}

impl Extraction {
    fn from_links(links: Vec<String>) -> Self {
        Self {
            links,
            malformed: Vec::new(),
        }
    }

    /// Number of hrefs skipped because they were not valid URLs.
    #[must_use]
    pub fn malformed_count(&self) -> usize {
        self.malformed.len()
    }
}

/// Insertion-ordered set of link strings.
#[derive(Debug, Default)]
pub(crate) struct LinkSet {
    links: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds `link` unless an identical string was already added.
    pub(crate) fn insert(&mut self, link: impl Into<String>) -> bool {
        let link = link.into();
        if self.seen.contains(&link) {
            return false;
        }
        self.seen.insert(link.clone());
        self.links.push(link);
        true
    }

    pub(crate) fn into_links(self) -> Vec<String> {
        self.links
    }
}

/// Extracts links from `body` according to its content kind.
///
/// XML is read with the same tolerant tree builder as HTML, so only
/// `<a href>` elements contribute. Relative hrefs resolve against `base`.
///
/// # Errors
///
/// Returns [`ExtractError::Json`] when a JSON body is not valid JSON. HTML
/// and plain text never fail.
pub fn extract(body: &[u8], kind: ContentKind, base: &Url) -> Result<Extraction, ExtractError> {
    match kind {
        ContentKind::Html | ContentKind::Xml => Ok(html::extract_html_links(body, base)),
        ContentKind::Json => json::extract_json_links(body).map(Extraction::from_links),
        ContentKind::PlainText => Ok(Extraction::from_links(text::extract_text_links(
            &String::from_utf8_lossy(body),
        ))),
    }
}

/// Fetches `url` and extracts the links on it.
///
/// # Errors
///
/// Returns [`ExtractError::Fetch`] if the page cannot be retrieved and
/// [`ExtractError::Json`] if a JSON page does not parse.
#[instrument(skip(fetcher), fields(url = %url))]
pub async fn extract_links_from_url(
    fetcher: &Fetcher,
    url: &str,
) -> Result<Extraction, ExtractError> {
    let page = fetcher.fetch(url).await?;
    let extraction = extract(&page.body, page.kind, &page.final_url)?;
    if extraction.malformed_count() > 0 {
        warn!(
            count = extraction.malformed_count(),
            "malformed URLs detected; continuing with valid links"
        );
    }
    Ok(extraction)
}
