//! Link extraction from a local file.

use std::io;
use std::path::Path;

use tokio::io::AsyncReadExt;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::ExtractError;
use super::{Extraction, extract, json, text};
use crate::fetch::{ContentKind, MAX_CONTENT_SIZE, sniff_content_kind};

/// Reads a local file and extracts the links in it.
///
/// The size is checked before the file is read, so an oversized file is
/// rejected without loading it. The document type is sniffed from the first
/// bytes; relative hrefs in HTML resolve against the file's own `file://` URL.
/// Content that looks like JSON but does not parse is scanned as plain text.
///
/// # Errors
///
/// - [`ExtractError::FileTooLarge`] when the file exceeds [`MAX_CONTENT_SIZE`]
/// - [`ExtractError::UnsupportedFileType`] for binary content
/// - [`ExtractError::Io`] when the file cannot be inspected or read
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn extract_links_from_file(path: impl AsRef<Path>) -> Result<Extraction, ExtractError> {
    let path = path.as_ref();

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ExtractError::io(path, e))?;
    ensure_within_limit(path, metadata.len())?;

    // The file may have grown since it was inspected.
    let content = read_at_most(path, MAX_CONTENT_SIZE).await?;
    ensure_within_limit(path, content.len() as u64)?;

    let Some(kind) = sniff_content_kind(&content) else {
        return Err(ExtractError::UnsupportedFileType {
            path: path.to_path_buf(),
        });
    };
    debug!(%kind, bytes = content.len(), "sniffed file type");

    let extraction = if kind == ContentKind::Json {
        match json::extract_json_links(&content) {
            Ok(links) => Extraction::from_links(links),
            Err(error) => {
                debug!(%error, "content looked like JSON but did not parse; scanning as text");
                Extraction::from_links(text::extract_text_links(&String::from_utf8_lossy(
                    &content,
                )))
            }
        }
    } else {
        let base = file_base_url(path).await?;
        extract(&content, kind, &base)?
    };

    if extraction.malformed_count() > 0 {
        warn!(
            count = extraction.malformed_count(),
            "malformed URLs detected; continuing with valid links"
        );
    }
    Ok(extraction)
}

/// Reads at most `limit + 1` bytes, so an over-limit file is detectable
/// without ever being read in full.
async fn read_at_most(path: &Path, limit: u64) -> Result<Vec<u8>, ExtractError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ExtractError::io(path, e))?;
    let mut content = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut content)
        .await
        .map_err(|e| ExtractError::io(path, e))?;
    Ok(content)
}

fn ensure_within_limit(path: &Path, size: u64) -> Result<(), ExtractError> {
    if size > MAX_CONTENT_SIZE {
        return Err(ExtractError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_CONTENT_SIZE,
        });
    }
    Ok(())
}

async fn file_base_url(path: &Path) -> Result<Url, ExtractError> {
    let absolute = tokio::fs::canonicalize(path)
        .await
        .map_err(|e| ExtractError::io(path, e))?;
    Url::from_file_path(&absolute).map_err(|()| {
        ExtractError::io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path cannot be expressed as a file:// URL",
            ),
        )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_extract_links_from_html_file_resolves_against_file_url() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.html");
        std::fs::write(
            &path,
            r#"<html><body><a href="https://example.com/a.zip">a</a><a href="b.zip">b</a></body></html>"#,
        )
        .unwrap();

        let extraction = extract_links_from_file(&path).await.unwrap();

        assert_eq!(extraction.links.len(), 2);
        assert_eq!(extraction.links[0], "https://example.com/a.zip");
        assert!(extraction.links[1].starts_with("file://"));
        assert!(extraction.links[1].ends_with("/b.zip"));
    }

    #[tokio::test]
    async fn test_extract_links_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"{"files": [{"url": "https://example.com/1.bin"}, {"url": "https://example.com/2.bin"}]}"#,
        )
        .unwrap();

        let extraction = extract_links_from_file(&path).await.unwrap();

        assert_eq!(
            extraction.links,
            vec!["https://example.com/1.bin", "https://example.com/2.bin"]
        );
    }

    #[tokio::test]
    async fn test_extract_links_from_broken_json_file_falls_back_to_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "[draft] see https://example.com/x.tar.gz").unwrap();

        let extraction = extract_links_from_file(&path).await.unwrap();

        assert_eq!(extraction.links, vec!["https://example.com/x.tar.gz"]);
    }

    #[tokio::test]
    async fn test_extract_links_from_text_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("links.txt");
        std::fs::write(
            &path,
            "https://example.com/a\nhttps://example.com/b\nhttps://example.com/a\n",
        )
        .unwrap();

        let extraction = extract_links_from_file(&path).await.unwrap();

        assert_eq!(
            extraction.links,
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[tokio::test]
    async fn test_extract_links_from_oversized_file_is_rejected_before_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("huge.txt");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(MAX_CONTENT_SIZE + 1).unwrap();

        let err = extract_links_from_file(&path).await.unwrap_err();

        assert!(
            matches!(err, ExtractError::FileTooLarge { limit, .. } if limit == MAX_CONTENT_SIZE),
            "got: {err:?}"
        );
        assert!(err.to_string().contains("10 MB"), "message: {err}");
    }

    #[tokio::test]
    async fn test_read_at_most_stops_one_byte_past_limit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("growing.txt");
        std::fs::write(&path, vec![b'x'; 64]).unwrap();

        let content = read_at_most(&path, 16).await.unwrap();

        assert_eq!(content.len(), 17);
    }

    #[tokio::test]
    async fn test_extract_links_from_binary_file_is_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("image.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR").unwrap();

        let err = extract_links_from_file(&path).await.unwrap_err();

        assert!(matches!(err, ExtractError::UnsupportedFileType { .. }));
    }

    #[tokio::test]
    async fn test_extract_links_from_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = extract_links_from_file(temp_dir.path().join("absent.html"))
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
