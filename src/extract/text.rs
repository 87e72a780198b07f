//! URL scanning over unstructured text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::LinkSet;

/// `http://` or `https://` followed by anything up to whitespace or a quote.
#[allow(clippy::expect_used)]
pub(super) static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"']+"#).expect("URL regex is valid") // Static pattern, safe to panic
});

/// Adds every non-overlapping URL match in `text` to `links`.
pub(super) fn collect_urls(text: &str, links: &mut LinkSet) {
    for url_match in URL_PATTERN.find_iter(text) {
        if links.insert(url_match.as_str()) {
            trace!(url = url_match.as_str(), "found URL");
        }
    }
}

/// Scans the whole buffer for URLs, deduplicated by exact string.
pub(super) fn extract_text_links(text: &str) -> Vec<String> {
    let mut links = LinkSet::new();
    collect_urls(text, &mut links);
    links.into_links()
}
