//! Shared HTTP client construction policy.
//!
//! The fetcher, the GitHub resolver and the download client all build their
//! `reqwest::Client` here so they agree on timeout, user agent, compression
//! and TLS behavior.

use reqwest::{Client, ClientBuilder};
use tracing::warn;

use crate::config::Config;
use crate::user_agent;

/// Builds an HTTP client that applies `config`'s timeout and TLS policy.
///
/// The timeout covers the whole request, including reading the body.
///
/// # Errors
///
/// Returns the underlying `reqwest::Error` when the TLS backend cannot be
/// initialized.
pub fn build_client(config: &Config) -> Result<Client, reqwest::Error> {
    base_client_builder(config).build()
}

fn base_client_builder(config: &Config) -> ClientBuilder {
    let mut builder = Client::builder()
        .timeout(config.timeout)
        .gzip(true)
        .user_agent(user_agent::default_user_agent());
    if config.ignore_cert_errors {
        warn!("TLS certificate verification is disabled for this run");
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder
}
