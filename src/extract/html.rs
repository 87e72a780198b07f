//! Anchor extraction from an HTML (or XML) document tree.

use scraper::{ElementRef, Html};
use tracing::{debug, trace};
use url::Url;

use super::{Extraction, LinkSet};

/// Schemes that never name a downloadable resource.
const NON_RESOURCE_SCHEMES: &[&str] = &["javascript:", "mailto:"];

/// Walks every element of the parsed document and collects resolved `<a href>` targets.
///
/// Hrefs that fail to resolve against `base` are returned in
/// [`Extraction::malformed`]; they never abort the walk.
pub(super) fn extract_html_links(body: &[u8], base: &Url) -> Extraction {
    let text = String::from_utf8_lossy(body);
    let document = Html::parse_document(&text);

    let mut links = LinkSet::new();
    let mut malformed = Vec::new();

    for element in document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
    {
        if !element.value().name().eq_ignore_ascii_case("a") {
            continue;
        }
        let Some(raw) = element.value().attr("href") else {
            continue;
        };
        // An empty href resolves to the base itself and is kept.
        let href = raw.trim();
        if href.starts_with('#') || has_non_resource_scheme(href) {
            trace!(href, "skipping non-resource href");
            continue;
        }

        match base.join(href) {
            Ok(resolved) => {
                let resolved = String::from(resolved);
                if has_non_resource_scheme(&resolved) {
                    continue;
                }
                links.insert(resolved);
            }
            Err(error) => {
                debug!(href, %error, "malformed href");
                malformed.push(raw.to_string());
            }
        }
    }

    Extraction {
        links: links.into_links(),
        malformed,
    }
}

fn has_non_resource_scheme(link: &str) -> bool {
    NON_RESOURCE_SCHEMES.iter().any(|scheme| {
        link.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_extract_html_links_mixed_anchor_types() {
        let html = br##"<!DOCTYPE html>
<html>
<body>
    <a href="https://example.com/page1">Page 1</a>
    <a href="https://example.com/page2">Page 2</a>
    <a href="#section">Section Link</a>
    <a href="javascript:void(0)">JavaScript Link</a>
    <a href="mailto:test@example.com">Email Link</a>
    <a href="page3">Relative Link</a>
</body>
</html>"##;

        let extraction = extract_html_links(html, &base());

        assert_eq!(
            extraction.links,
            vec![
                "https://example.com/page1",
                "https://example.com/page2",
                "https://example.com/page3",
            ]
        );
        assert!(extraction.malformed.is_empty());
    }

    #[test]
    fn test_extract_html_links_empty_href_resolves_to_base() {
        let base = Url::parse("https://example.com/dir/").unwrap();
        let html = br#"<a href="">self</a><a href="x.zip">archive</a>"#;

        let extraction = extract_html_links(html, &base);

        assert_eq!(
            extraction.links,
            vec!["https://example.com/dir/", "https://example.com/dir/x.zip"]
        );
    }

    #[test]
    fn test_extract_html_links_deduplicates_in_document_order() {
        let html = br#"<p><a href="/b">b</a><a href="/a">a</a><a href="https://example.com/b">b again</a></p>"#;

        let extraction = extract_html_links(html, &base());

        assert_eq!(
            extraction.links,
            vec!["https://example.com/b", "https://example.com/a"]
        );
    }

    #[test]
    fn test_extract_html_links_resolves_relative_forms() {
        let base = Url::parse("https://example.com/dir/index.html").unwrap();
        let html = br#"
            <a href="file.zip">sibling</a>
            <a href="../up.tar.gz">parent</a>
            <a href="//cdn.example.net/x.iso">scheme-relative</a>
            <a href="https://other.example.org/abs">absolute</a>
        "#;

        let extraction = extract_html_links(html, &base);

        assert_eq!(
            extraction.links,
            vec![
                "https://example.com/dir/file.zip",
                "https://example.com/up.tar.gz",
                "https://cdn.example.net/x.iso",
                "https://other.example.org/abs",
            ]
        );
    }

    #[test]
    fn test_extract_html_links_records_malformed_without_aborting() {
        let html = br#"
            <a href="http://[invalid-host">broken</a>
            <a href="/good.zip">good</a>
        "#;

        let extraction = extract_html_links(html, &base());

        assert_eq!(extraction.links, vec!["https://example.com/good.zip"]);
        assert_eq!(extraction.malformed, vec!["http://[invalid-host"]);
    }

    #[test]
    fn test_extract_html_links_skips_schemes_case_insensitively() {
        let html = br#"<a href="JavaScript:alert(1)">x</a><a href="MAILTO:a@b.c">y</a><a href=" #top ">z</a>"#;

        let extraction = extract_html_links(html, &base());

        assert!(extraction.links.is_empty(), "got {:?}", extraction.links);
        assert!(extraction.malformed.is_empty());
    }

    #[test]
    fn test_extract_html_links_ignores_other_elements_and_missing_href() {
        let html = br#"<link href="/style.css"><img src="/logo.png"><a name="anchor">no href</a><A HREF="/upper.bin">x</A>"#;

        let extraction = extract_html_links(html, &base());

        assert_eq!(extraction.links, vec!["https://example.com/upper.bin"]);
    }

    #[test]
    fn test_extract_html_links_empty_document() {
        let extraction = extract_html_links(b"", &base());
        assert!(extraction.links.is_empty());
        assert!(extraction.malformed.is_empty());
    }

    #[test]
    fn test_extract_html_links_tolerates_invalid_utf8() {
        let mut html = b"<a href=\"/ok.bin\">".to_vec();
        html.extend_from_slice(&[0xFF, 0xFE]);
        html.extend_from_slice(b"</a>");

        let extraction = extract_html_links(&html, &base());

        assert_eq!(extraction.links, vec!["https://example.com/ok.bin"]);
    }
}
