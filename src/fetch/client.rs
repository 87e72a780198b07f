//! HTTP page retrieval with a bounded body read.

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument, warn};
use url::Url;

use super::content_type::ContentKind;
use super::error::FetchError;
use crate::config::Config;
use crate::http::build_client;

/// Hard ceiling on how many bytes of a page or local file are ever held in memory (10 MB).
pub const MAX_CONTENT_SIZE: u64 = 10 * 1024 * 1024;

/// A successfully fetched page, ready for link extraction.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Response body, at most [`MAX_CONTENT_SIZE`] bytes.
    pub body: Vec<u8>,
    /// The declared `Content-Type` header value.
    pub content_type: String,
    /// Classification of `content_type`.
    pub kind: ContentKind,
    /// URL after redirects; relative links resolve against this.
    pub final_url: Url,
    /// Whether the body was cut at the size ceiling.
    pub truncated: bool,
}

/// Fetches pages for link extraction.
///
/// Create once per run and reuse; the inner client pools connections.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher that applies `config`'s timeout and TLS policy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = build_client(config).map_err(FetchError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Retrieves `url` and returns its body and classified content type.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] for unparseable or non-HTTP(S) URLs
    /// - [`FetchError::Timeout`] / [`FetchError::Network`] for transport failures
    /// - [`FetchError::HttpStatus`] for non-success responses (no body is returned)
    /// - [`FetchError::UnsupportedContentType`] for anything but HTML, JSON or XML
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::invalid_url(url));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let Some(kind) = ContentKind::from_content_type(&content_type) else {
            return Err(FetchError::unsupported_content_type(url, content_type));
        };

        let final_url = response.url().clone();
        let (body, truncated) = read_body_limited(response, MAX_CONTENT_SIZE)
            .await
            .map_err(|e| FetchError::from_transport(url, e))?;
        if truncated {
            warn!(
                limit_bytes = MAX_CONTENT_SIZE,
                "response body exceeded size ceiling; truncated"
            );
        }

        debug!(bytes = body.len(), %kind, final_url = %final_url, "page fetched");
        Ok(FetchedPage {
            body,
            content_type,
            kind,
            final_url,
            truncated,
        })
    }
}

/// Reads at most `limit` bytes of a response body.
///
/// Returns the bytes read and whether the stream had more data past the limit.
/// The rest of the stream is dropped unread.
pub(crate) async fn read_body_limited(
    response: reqwest::Response,
    limit: u64,
) -> Result<(Vec<u8>, bool), reqwest::Error> {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let capacity = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .map_or(0, |len| len.min(limit));
    let mut body = Vec::with_capacity(capacity);
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let remaining = limit - body.len();
        if chunk.len() > remaining {
            body.extend_from_slice(&chunk[..remaining]);
            return Ok((body, true));
        }
        body.extend_from_slice(&chunk);
    }

    Ok((body, false))
}
