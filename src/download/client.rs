//! HTTP client wrapper for downloading single files.
//!
//! [`DownloadClient`] owns the request policy (timeout, TLS, size ceiling)
//! and the streaming write. It is shared by the sequential and concurrent
//! engines, which differ only in how they pick the target path.

use std::io;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::{Client, Response};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::MAX_DOWNLOAD_SIZE;
use super::error::DownloadError;
use super::filename::filename_from_url;
use super::progress::ProgressDisplay;
use crate::config::Config;
use crate::http::build_client;

/// HTTP client for downloading files with streaming support.
///
/// Create once per batch and reuse; clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// use lsweb_core::Config;
/// use lsweb_core::download::{DownloadClient, ProgressDisplay};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DownloadClient::new(&Config::default())?;
/// let path = client
///     .download_one("https://example.com/tool.tar.gz", Path::new("."), &ProgressDisplay::Hidden)
///     .await?;
/// println!("Downloaded to: {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DownloadClient {
    client: Client,
    overwrite: bool,
}

impl DownloadClient {
    /// Creates a client that applies `config`'s timeout, TLS and overwrite policy.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if HTTP client construction fails.
    pub fn new(config: &Config) -> Result<Self, DownloadError> {
        let client = build_client(config).map_err(DownloadError::ClientBuild)?;
        Ok(Self {
            client,
            overwrite: config.overwrite,
        })
    }

    /// Whether existing files are replaced.
    #[must_use]
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Downloads `url` into `output_dir` under the name derived from its path.
    ///
    /// With overwrite disabled, an existing target fails fast with
    /// [`DownloadError::AlreadyExists`] before any request is made, and the
    /// existing file is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The target exists and overwrite is disabled
    /// - The request fails (network error, timeout)
    /// - The server returns an error status or a length over the ceiling
    /// - Writing to disk fails (the partial file is removed)
    #[must_use = "download result contains the path to the downloaded file"]
    #[instrument(skip(self, output_dir, progress), fields(url = %url))]
    pub async fn download_one(
        &self,
        url: &str,
        output_dir: &Path,
        progress: &ProgressDisplay,
    ) -> Result<PathBuf, DownloadError> {
        let parsed = parse_download_url(url)?;
        let path = output_dir.join(filename_from_url(&parsed));

        if !self.overwrite && tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(DownloadError::already_exists(path));
        }

        let response = self.request(url).await?;
        let file = self.create_target(&path).await?;
        write_response(url, response, file, &path, progress).await?;
        Ok(path)
    }

    /// Sends the GET request and validates status and declared length.
    pub(crate) async fn request(&self, url: &str) -> Result<Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status));
        }
        DownloadError::check_content_length(url, response.content_length())?;

        Ok(response)
    }

    /// Opens the target for writing, honoring the overwrite policy.
    ///
    /// `create_new` closes the gap between the existence check and the create.
    pub(crate) async fn create_target(&self, path: &Path) -> Result<File, DownloadError> {
        let mut options = OpenOptions::new();
        options.write(true);
        if self.overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        options.open(path).await.map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                DownloadError::already_exists(path)
            } else {
                DownloadError::io(path, e)
            }
        })
    }
}

/// Streams the response body into `file`, removing the file on any failure.
pub(crate) async fn write_response(
    url: &str,
    response: Response,
    mut file: File,
    path: &Path,
    progress: &ProgressDisplay,
) -> Result<u64, DownloadError> {
    let label = path
        .file_name()
        .map_or_else(|| url.to_string(), |n| n.to_string_lossy().into_owned());
    let bar = progress.bar_for(&label, response.content_length());

    let result = stream_to_file(&mut file, response, url, path, &bar).await;
    drop(file);

    match result {
        Ok(bytes) => {
            bar.finish_and_clear();
            debug!(path = %path.display(), bytes, "download written");
            Ok(bytes)
        }
        Err(e) => {
            bar.abandon();
            let _ = tokio::fs::remove_file(path).await;
            debug!(path = %path.display(), error = %e, "removed partial download");
            Err(e)
        }
    }
}

/// Parses a download URL, accepting only HTTP(S).
pub(crate) fn parse_download_url(url: &str) -> Result<Url, DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
    if matches!(parsed.scheme(), "http" | "https") {
        Ok(parsed)
    } else {
        Err(DownloadError::invalid_url(url))
    }
}

/// Streams response body to file, returning bytes written.
///
/// The caller removes the file when this fails.
async fn stream_to_file(
    file: &mut File,
    response: Response,
    url: &str,
    file_path: &Path,
    bar: &indicatif::ProgressBar,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        bytes_written += chunk.len() as u64;
        // Servers that omit Content-Length are held to the same ceiling.
        if bytes_written > MAX_DOWNLOAD_SIZE {
            return Err(DownloadError::TooLarge {
                url: url.to_string(),
                size: bytes_written,
            });
        }

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;
        bar.inc(chunk.len() as u64);
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn client(config: &Config) -> DownloadClient {
        DownloadClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_download_one_success() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/tool.tar.gz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"archive bytes"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/tool.tar.gz", mock_server.uri());
        let file_path = client(&Config::default())
            .download_one(&url, temp_dir.path(), &ProgressDisplay::Hidden)
            .await
            .unwrap();

        assert_eq!(file_path, temp_dir.path().join("tool.tar.gz"));
        assert_eq!(std::fs::read(&file_path).unwrap(), b"archive bytes");
    }

    #[tokio::test]
    async fn test_download_one_404_leaves_no_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/missing.bin", mock_server.uri());
        let err = client(&Config::default())
            .download_one(&url, temp_dir.path(), &ProgressDisplay::Hidden)
            .await
            .unwrap_err();

        assert!(
            matches!(err, DownloadError::HttpStatus { status: 404, .. }),
            "got: {err:?}"
        );
        assert!(!temp_dir.path().join("missing.bin").exists());
    }

    #[tokio::test]
    async fn test_download_one_existing_file_is_not_touched() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let existing = temp_dir.path().join("report.pdf");
        std::fs::write(&existing, b"original").unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"replacement"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let url = format!("{}/report.pdf", mock_server.uri());
        let err = client(&Config::default())
            .download_one(&url, temp_dir.path(), &ProgressDisplay::Hidden)
            .await
            .unwrap_err();

        assert!(
            matches!(err, DownloadError::AlreadyExists { .. }),
            "got: {err:?}"
        );
        assert_eq!(std::fs::read(&existing).unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_download_one_overwrite_replaces_existing_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let existing = temp_dir.path().join("report.pdf");
        std::fs::write(&existing, b"original, longer than the replacement").unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"replacement"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/report.pdf", mock_server.uri());
        let path = client(&Config::new().with_overwrite(true))
            .download_one(&url, temp_dir.path(), &ProgressDisplay::Hidden)
            .await
            .unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"replacement");
    }

    #[tokio::test]
    async fn test_download_one_timeout_leaves_no_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"late")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let config = Config::new().with_timeout(Duration::from_millis(200));
        let url = format!("{}/slow.bin", mock_server.uri());
        let err = client(&config)
            .download_one(&url, temp_dir.path(), &ProgressDisplay::Hidden)
            .await
            .unwrap_err();

        assert!(matches!(err, DownloadError::Timeout { .. }), "got: {err:?}");
        assert!(!temp_dir.path().join("slow.bin").exists());
    }

    #[test]
    fn test_download_one_invalid_url() {
        let temp_dir = TempDir::new().unwrap();
        let client = client(&Config::default());
        let result = tokio_test::block_on(client.download_one(
            "not a url",
            temp_dir.path(),
            &ProgressDisplay::Hidden,
        ));
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[test]
    fn test_parse_download_url_rejects_non_http() {
        assert!(parse_download_url("https://example.com/a").is_ok());
        assert!(matches!(
            parse_download_url("file:///etc/passwd"),
            Err(DownloadError::InvalidUrl { .. })
        ));
    }
}
