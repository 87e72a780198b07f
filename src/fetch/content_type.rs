//! Content-type classification for fetched pages and local files.

use std::fmt;

/// Number of leading bytes inspected when sniffing a local file.
pub const SNIFF_LEN: usize = 512;

/// Markup signatures that identify an HTML document when they open the input.
/// Each must be followed by a space or `>` to count.
const HTML_SIGNATURES: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The document families the link extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// HTML or XHTML markup; anchors are walked.
    Html,
    /// A JSON document; string values are scanned for URLs.
    Json,
    /// XML-family markup; parsed with the tolerant HTML tree builder.
    Xml,
    /// Unstructured text; scanned for URLs. Only produced by sniffing.
    PlainText,
}

impl ContentKind {
    /// Classifies a `Content-Type` header value.
    ///
    /// Returns `None` for anything outside the HTML, JSON and XML families;
    /// the fetcher rejects those instead of guessing.
    #[must_use]
    pub fn from_content_type(header: &str) -> Option<Self> {
        let mime = header
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "text/html" | "application/xhtml+xml" => Some(Self::Html),
            "application/json" => Some(Self::Json),
            "application/xml" | "text/xml" => Some(Self::Xml),
            other if other.ends_with("+json") => Some(Self::Json),
            other if other.ends_with("+xml") => Some(Self::Xml),
            _ => None,
        }
    }

    /// Stable lowercase label used in logs and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::PlainText => "text",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guesses the content kind of a buffer from its first [`SNIFF_LEN`] bytes.
///
/// Leading whitespace and a UTF-8 byte-order mark are skipped. Markup
/// signatures win, then a leading `{` or `[` marks JSON, and anything else
/// free of binary control bytes is plain text. Returns `None` for binary data.
#[must_use]
pub fn sniff_content_kind(data: &[u8]) -> Option<ContentKind> {
    let head = &data[..data.len().min(SNIFF_LEN)];
    let head = head.strip_prefix(UTF8_BOM).unwrap_or(head);
    let start = head
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0c' | b'\r' | b' '))
        .unwrap_or(head.len());
    let trimmed = &head[start..];

    if HTML_SIGNATURES
        .iter()
        .any(|signature| matches_markup_signature(trimmed, signature))
    {
        return Some(ContentKind::Html);
    }
    if starts_with_ignore_case(trimmed, b"<?xml") {
        return Some(ContentKind::Xml);
    }
    if matches!(trimmed.first(), Some(b'{' | b'[')) {
        return Some(ContentKind::Json);
    }
    if head.iter().any(|&b| is_binary_byte(b)) {
        return None;
    }
    Some(ContentKind::PlainText)
}

fn matches_markup_signature(data: &[u8], signature: &[u8]) -> bool {
    if !starts_with_ignore_case(data, signature) {
        return false;
    }
    // Comment openers need no terminator; tags must end at a space or '>'.
    if signature == b"<!--" {
        return true;
    }
    matches!(data.get(signature.len()), Some(b' ' | b'>'))
}

fn starts_with_ignore_case(data: &[u8], prefix: &[u8]) -> bool {
    data.len() >= prefix.len() && data[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_content_type_html_with_charset() {
        assert_eq!(
            ContentKind::from_content_type("text/html; charset=utf-8"),
            Some(ContentKind::Html)
        );
    }

    #[test]
    fn test_from_content_type_json_variants() {
        assert_eq!(
            ContentKind::from_content_type("application/json"),
            Some(ContentKind::Json)
        );
        assert_eq!(
            ContentKind::from_content_type("application/vnd.github+json"),
            Some(ContentKind::Json)
        );
    }

    #[test]
    fn test_from_content_type_xml_variants() {
        assert_eq!(
            ContentKind::from_content_type("application/xml"),
            Some(ContentKind::Xml)
        );
        assert_eq!(
            ContentKind::from_content_type("TEXT/XML"),
            Some(ContentKind::Xml)
        );
        assert_eq!(
            ContentKind::from_content_type("application/rss+xml"),
            Some(ContentKind::Xml)
        );
    }

    #[test]
    fn test_from_content_type_rejects_other_types() {
        assert_eq!(ContentKind::from_content_type("image/png"), None);
        assert_eq!(ContentKind::from_content_type("text/plain"), None);
        assert_eq!(ContentKind::from_content_type(""), None);
    }

    #[test]
    fn test_sniff_html_doctype_case_insensitive() {
        assert_eq!(
            sniff_content_kind(b"\n  <!doctype html>\n<html></html>"),
            Some(ContentKind::Html)
        );
    }

    #[test]
    fn test_sniff_html_requires_tag_terminator() {
        assert_eq!(
            sniff_content_kind(b"<a href=\"x\">x</a>"),
            Some(ContentKind::Html)
        );
        // "<about>" is not an anchor tag
        assert_eq!(
            sniff_content_kind(b"<about>text</about>"),
            Some(ContentKind::PlainText)
        );
    }

    #[test]
    fn test_sniff_xml_declaration() {
        assert_eq!(
            sniff_content_kind(b"<?xml version=\"1.0\"?><feed/>"),
            Some(ContentKind::Xml)
        );
    }

    #[test]
    fn test_sniff_json_object_and_array() {
        assert_eq!(
            sniff_content_kind(b"  {\"url\": \"https://example.com\"}"),
            Some(ContentKind::Json)
        );
        assert_eq!(sniff_content_kind(b"[1, 2]"), Some(ContentKind::Json));
    }

    #[test]
    fn test_sniff_skips_byte_order_mark() {
        assert_eq!(
            sniff_content_kind(b"\xEF\xBB\xBF<html><body></body></html>"),
            Some(ContentKind::Html)
        );
    }

    #[test]
    fn test_sniff_plain_text_and_empty() {
        assert_eq!(
            sniff_content_kind(b"see https://example.com/file.zip"),
            Some(ContentKind::PlainText)
        );
        assert_eq!(sniff_content_kind(b""), Some(ContentKind::PlainText));
    }

    #[test]
    fn test_sniff_binary_returns_none() {
        assert_eq!(sniff_content_kind(b"\x89PNG\r\n\x1a\n\x00\x00"), None);
    }

    #[test]
    fn test_sniff_only_looks_at_first_bytes() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(sniff_content_kind(&data), Some(ContentKind::PlainText));
    }
}
