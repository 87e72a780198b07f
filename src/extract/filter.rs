//! Pure list transforms applied to extracted links before listing or download.

use regex::Regex;

/// Keeps the links that match `pattern`, in their original order.
///
/// # Errors
///
/// Returns the regex compile error when `pattern` is not a valid expression.
pub fn filter_links(links: &[String], pattern: &str) -> Result<Vec<String>, regex::Error> {
    let re = Regex::new(pattern)?;
    Ok(links
        .iter()
        .filter(|link| re.is_match(link))
        .cloned()
        .collect())
}

/// Keeps the first `limit` links. A limit of zero leaves the list unchanged.
#[must_use]
pub fn limit_links(mut links: Vec<String>, limit: usize) -> Vec<String> {
    if limit > 0 {
        links.truncate(limit);
    }
    links
}
