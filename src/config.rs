//! Runtime configuration shared by the fetcher, the GitHub resolver and the
//! download engine.
//!
//! A [`Config`] is built once before any work starts and handed to each
//! component's constructor. Components copy what they need; nothing reads
//! ambient mutable state, so a batch can never observe a half-updated value.

use std::time::Duration;

use tracing::warn;

/// Default per-request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default ceiling on simultaneous downloads.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default wall-clock budget for a sequential download batch (10 minutes).
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(600);

/// Default pause between sequential downloads.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Network and download policy for one run of the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Timeout applied to each individual HTTP request, body included.
    pub timeout: Duration,
    max_concurrent: usize,
    /// Replace files that already exist instead of skipping or renaming.
    pub overwrite: bool,
    /// Skip TLS certificate verification. Explicit opt-in only.
    pub ignore_cert_errors: bool,
    /// Overall deadline for a sequential batch, checked between items.
    pub batch_timeout: Duration,
    /// Pause inserted between items of a sequential batch.
    pub request_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            overwrite: false,
            ignore_cert_errors: false,
            batch_timeout: DEFAULT_BATCH_TIMEOUT,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

impl Config {
    /// Creates a configuration with the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the concurrency ceiling used by the concurrent engine.
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Sets the concurrency ceiling.
    ///
    /// A value of zero is ignored and the previous ceiling is kept.
    pub fn set_max_concurrent(&mut self, max_concurrent: usize) {
        if max_concurrent == 0 {
            warn!(
                current = self.max_concurrent,
                "ignoring max concurrent value of 0; keeping previous ceiling"
            );
            return;
        }
        self.max_concurrent = max_concurrent;
    }

    /// Builder-style variant of [`set_max_concurrent`](Self::set_max_concurrent).
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.set_max_concurrent(max_concurrent);
        self
    }

    /// Builder-style setter for the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style setter for the overwrite policy.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Builder-style setter for the TLS verification bypass.
    #[must_use]
    pub fn with_ignore_cert_errors(mut self, ignore: bool) -> Self {
        self.ignore_cert_errors = ignore;
        self
    }

    /// Builder-style setter for the sequential batch deadline.
    #[must_use]
    pub fn with_batch_timeout(mut self, batch_timeout: Duration) -> Self {
        self.batch_timeout = batch_timeout;
        self
    }

    /// Builder-style setter for the pause between sequential downloads.
    #[must_use]
    pub fn with_request_delay(mut self, request_delay: Duration) -> Self {
        self.request_delay = request_delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_concurrent(), 5);
        assert!(!config.overwrite);
        assert!(!config.ignore_cert_errors);
        assert_eq!(config.batch_timeout, Duration::from_secs(600));
        assert_eq!(config.request_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_set_max_concurrent_accepts_positive_values() {
        let mut config = Config::new();
        config.set_max_concurrent(12);
        assert_eq!(config.max_concurrent(), 12);
        config.set_max_concurrent(1);
        assert_eq!(config.max_concurrent(), 1);
    }

    #[test]
    fn test_set_max_concurrent_zero_keeps_previous_value() {
        let mut config = Config::new().with_max_concurrent(8);
        config.set_max_concurrent(0);
        assert_eq!(config.max_concurrent(), 8);
    }

    #[test]
    fn test_builder_setters_chain() {
        let config = Config::new()
            .with_timeout(Duration::from_secs(5))
            .with_overwrite(true)
            .with_ignore_cert_errors(true)
            .with_batch_timeout(Duration::from_secs(60))
            .with_request_delay(Duration::ZERO);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.overwrite);
        assert!(config.ignore_cert_errors);
        assert_eq!(config.batch_timeout, Duration::from_secs(60));
        assert_eq!(config.request_delay, Duration::ZERO);
    }
}
