//! Batch download engine with sequential and bounded-concurrency modes.
//!
//! Both modes attempt every URL, isolate per-item failures, and finish with
//! either [`DownloadStats`] or a [`BatchError`] that reports how many items
//! failed out of how many were given.
//!
//! # Example
//!
//! ```no_run
//! use lsweb_core::Config;
//! use lsweb_core::download::DownloadEngine;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(&Config::default().with_max_concurrent(4), ".")?;
//! let urls = vec![
//!     "https://example.com/a.tar.gz".to_string(),
//!     "https://example.com/b.tar.gz".to_string(),
//! ];
//! let stats = engine.download_all_concurrently(&urls, false).await?;
//! println!("Completed: {}/{}", stats.completed(), stats.total());
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore, mpsc};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::client::{DownloadClient, parse_download_url, write_response};
use super::error::{BatchError, DownloadError};
use super::filename::{claim_batch_name, filename_from_url, reserve_unique_path};
use super::progress::ProgressDisplay;
use crate::config::Config;

/// Final state of one download job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The file was written to this path.
    Success(PathBuf),
    /// The target already existed and overwrite was disabled; nothing was written.
    SkippedExisting(PathBuf),
    /// The job failed for the given reason.
    Failed(String),
}

impl JobOutcome {
    fn from_result(result: Result<PathBuf, DownloadError>) -> Self {
        match result {
            Ok(path) => Self::Success(path),
            Err(DownloadError::AlreadyExists { path }) => Self::SkippedExisting(path),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// The message reported in a batch error, or `None` for a success.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::SkippedExisting(path) => {
                Some(DownloadError::already_exists(path.clone()).to_string())
            }
            Self::Failed(reason) => Some(reason.clone()),
        }
    }
}

/// Statistics from a download batch.
///
/// Counters are atomic so concurrent workers can record into one instance.
#[derive(Debug, Default)]
pub struct DownloadStats {
    total: usize,
    completed: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl DownloadStats {
    /// Creates empty statistics for a batch of `total` items.
    #[must_use]
    pub fn with_total(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Items in the batch.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Files written successfully.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Items skipped because the target already existed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::SeqCst)
    }

    /// Items that failed outright.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Items that produced no file: failed plus skipped.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failed() + self.skipped()
    }

    /// Highest number of jobs that were transferring at the same moment.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, outcome: &JobOutcome) {
        let counter = match outcome {
            JobOutcome::Success(_) => &self.completed,
            JobOutcome::SkippedExisting(_) => &self.skipped,
            JobOutcome::Failed(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn enter_flight(&self) -> InFlightGuard<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlightGuard { stats: self }
    }

    fn snapshot(&self) -> Self {
        Self {
            total: self.total,
            completed: AtomicUsize::new(self.completed()),
            skipped: AtomicUsize::new(self.skipped()),
            failed: AtomicUsize::new(self.failed()),
            in_flight: AtomicUsize::new(self.in_flight.load(Ordering::SeqCst)),
            peak_in_flight: AtomicUsize::new(self.peak_in_flight()),
        }
    }

    fn into_result(self, messages: Vec<String>) -> Result<Self, BatchError> {
        let failures = self.failures();
        if failures == 0 {
            return Ok(self);
        }
        Err(BatchError::Failed {
            failed: failures,
            total: self.total,
            messages,
        })
    }
}

/// Marks one job as transferring for as long as it is held.
struct InFlightGuard<'a> {
    stats: &'a DownloadStats,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Downloads batches of URLs into one output directory.
///
/// The concurrency ceiling, overwrite policy, batch deadline and pacing
/// delay are fixed at construction from a [`Config`].
#[derive(Debug)]
pub struct DownloadEngine {
    client: DownloadClient,
    output_dir: PathBuf,
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
    batch_timeout: Duration,
    request_delay: Duration,
}

impl DownloadEngine {
    /// Creates an engine writing into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if HTTP client construction fails.
    #[instrument(level = "debug", skip(config, output_dir))]
    pub fn new(config: &Config, output_dir: impl Into<PathBuf>) -> Result<Self, DownloadError> {
        let client = DownloadClient::new(config)?;
        let max_concurrent = config.max_concurrent();

        debug!(
            max_concurrent,
            overwrite = config.overwrite,
            batch_timeout_secs = config.batch_timeout.as_secs(),
            "creating download engine"
        );

        Ok(Self {
            client,
            output_dir: output_dir.into(),
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            batch_timeout: config.batch_timeout,
            request_delay: config.request_delay,
        })
    }

    /// Returns the configured concurrency ceiling.
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Returns the directory files are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Downloads `urls` one at a time, in order.
    ///
    /// A failed item is logged and counted; the loop moves on. An existing
    /// target is skipped (and counted as a failure) unless overwrite is on.
    /// The configured delay is inserted between items, and the batch deadline
    /// is checked before each one.
    ///
    /// # Errors
    ///
    /// - [`BatchError::Empty`] when `urls` is empty
    /// - [`BatchError::TimedOut`] when the deadline passes; remaining items are not attempted
    /// - [`BatchError::Failed`] when any item failed
    #[instrument(skip(self, urls), fields(total = urls.len(), output_dir = %self.output_dir.display()))]
    pub async fn download_all(
        &self,
        urls: &[String],
        show_progress: bool,
    ) -> Result<DownloadStats, BatchError> {
        if urls.is_empty() {
            return Err(BatchError::Empty);
        }

        let total = urls.len();
        let stats = DownloadStats::with_total(total);
        let progress = ProgressDisplay::new(show_progress, false);
        let deadline = Instant::now() + self.batch_timeout;
        let mut messages = Vec::new();

        info!(total, "starting sequential download batch");

        for (index, url) in urls.iter().enumerate() {
            if index > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
            if Instant::now() >= deadline {
                warn!(completed = index, total, "batch deadline reached");
                return Err(BatchError::TimedOut {
                    completed: index,
                    total,
                });
            }

            info!("[{}/{}] Downloading {}", index + 1, total, url);
            let result = {
                let _flight = stats.enter_flight();
                self.client
                    .download_one(url, &self.output_dir, &progress)
                    .await
            };
            let outcome = JobOutcome::from_result(result);
            stats.record(&outcome);

            match &outcome {
                JobOutcome::Success(path) => {
                    debug!(url = %url, path = %path.display(), "download completed");
                }
                JobOutcome::SkippedExisting(path) => {
                    warn!(url = %url, path = %path.display(), "file exists; skipped");
                }
                JobOutcome::Failed(reason) => {
                    warn!(url = %url, error = %reason, "download failed");
                }
            }
            if let Some(message) = outcome.failure_message() {
                messages.push(message);
            }
        }

        info!(
            "Download complete: {}/{} files downloaded successfully",
            stats.completed(),
            total
        );
        stats.into_result(messages)
    }

    /// Downloads `urls` in parallel, at most [`max_concurrent`](Self::max_concurrent) at a time.
    ///
    /// Each job holds a slot from before its request until its file is
    /// written. Colliding filenames are resolved under a single lock by
    /// taking `name.1`, `name.2`, ... so no two jobs ever write the same
    /// file, with or without overwrite. There is no batch deadline in this mode;
    /// each request is bounded by the per-request timeout.
    ///
    /// # Errors
    ///
    /// - [`BatchError::Empty`] when `urls` is empty
    /// - [`BatchError::Failed`] when any job failed, with every failure message
    #[instrument(skip(self, urls), fields(total = urls.len(), output_dir = %self.output_dir.display()))]
    pub async fn download_all_concurrently(
        &self,
        urls: &[String],
        show_progress: bool,
    ) -> Result<DownloadStats, BatchError> {
        if urls.is_empty() {
            return Err(BatchError::Empty);
        }

        let total = urls.len();
        let stats = Arc::new(DownloadStats::with_total(total));
        let progress = ProgressDisplay::new(show_progress, true);
        let (error_tx, mut error_rx) = mpsc::channel::<String>(total);
        let claimed_names = Arc::new(Mutex::new(HashSet::new()));
        let mut handles = Vec::with_capacity(total);
        let mut messages = Vec::new();

        info!(
            total,
            max_concurrent = self.max_concurrent,
            "starting concurrent download batch"
        );

        for url in urls {
            // Acquire semaphore permit (blocks if at concurrency limit)
            let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    let outcome = JobOutcome::Failed(format!("{url}: download slots closed"));
                    stats.record(&outcome);
                    messages.extend(outcome.failure_message());
                    continue;
                }
            };

            let url = url.clone();
            let client = self.client.clone();
            let output_dir = self.output_dir.clone();
            let claimed_names = Arc::clone(&claimed_names);
            let progress = progress.clone();
            let stats = Arc::clone(&stats);
            let error_tx = error_tx.clone();

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;

                let result = {
                    let _flight = stats.enter_flight();
                    download_reserving_name(&client, &url, &output_dir, &claimed_names, &progress)
                        .await
                };
                let outcome = JobOutcome::from_result(result);
                stats.record(&outcome);

                match outcome.failure_message() {
                    None => debug!(url = %url, "download completed"),
                    Some(message) => {
                        warn!(url = %url, error = %message, "download failed");
                        // Capacity equals the job count, so this never waits.
                        let _ = error_tx.send(message).await;
                    }
                }
            }));
        }
        drop(error_tx);

        for handle in handles {
            if let Err(join_error) = handle.await {
                warn!(error = %join_error, "download task did not complete");
                let outcome = JobOutcome::Failed(format!("download task failed: {join_error}"));
                stats.record(&outcome);
                messages.extend(outcome.failure_message());
            }
        }
        while let Some(message) = error_rx.recv().await {
            messages.push(message);
        }

        let stats = Arc::try_unwrap(stats).unwrap_or_else(|shared| shared.snapshot());
        info!(
            "Download complete: {}/{} files downloaded successfully",
            stats.completed(),
            total
        );
        stats.into_result(messages)
    }
}

/// One concurrent job: reserve a unique name, fetch, write.
///
/// Names are chosen under the batch's `claimed_names` lock, so no two jobs
/// of a batch ever target the same file. Without overwrite the file is
/// created during the reservation and removed again if the request fails.
/// With overwrite the name is only claimed for the batch, and the target is
/// opened after the response arrives.
async fn download_reserving_name(
    client: &DownloadClient,
    url: &str,
    output_dir: &Path,
    claimed_names: &Mutex<HashSet<String>>,
    progress: &ProgressDisplay,
) -> Result<PathBuf, DownloadError> {
    let parsed = parse_download_url(url)?;
    let filename = filename_from_url(&parsed);

    let (path, reserved) = {
        let mut claimed = claimed_names.lock().await;
        if client.overwrite() {
            (claim_batch_name(&mut claimed, output_dir, &filename)?, None)
        } else {
            let (path, file) = reserve_unique_path(output_dir, &filename).await?;
            (path, Some(file))
        }
    };

    let response = match client.request(url).await {
        Ok(response) => response,
        Err(e) => {
            if let Some(file) = reserved {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
            }
            return Err(e);
        }
    };

    let file = match reserved {
        Some(file) => file,
        None => client.create_target(&path).await?,
    };

    write_response(url, response, file, &path, progress).await?;
    Ok(path)
}
