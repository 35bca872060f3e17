//! Batch fetching of many URLs with bounded concurrency.
//!
//! A failing URL is logged and recorded in the report; it never aborts the
//! rest of the batch.
//!
//! # Example
//!
//! ```no_run
//! use feed_downloader::download::{Downloader, DownloaderConfig, FetchEngine};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new(DownloaderConfig::default())?;
//! let engine = FetchEngine::new(8)?;
//! let urls = vec!["https://example.com/a.xml".to_string()];
//! let report = engine.fetch_all(&downloader, urls, Path::new("./feeds")).await?;
//! println!("Completed: {}, Failed: {}", report.completed(), report.failed());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::client::Downloader;
use super::error::DownloadError;
use super::output::save_body;

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Error type for batch engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Result of fetching one URL.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// Body fetched, normalized and written to disk.
    Saved {
        /// File the body was written to.
        path: PathBuf,
        /// Final content type, if the response carried one.
        content_type: Option<String>,
        /// Body length in bytes.
        bytes: usize,
    },
    /// The URL was skipped.
    Failed {
        /// Machine-readable failure kind.
        kind: &'static str,
        /// Human-readable failure detail.
        error: String,
    },
}

/// Per-URL entry in a [`BatchReport`].
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    /// URL as given in the input.
    pub url: String,
    /// What happened to it.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl FetchOutcome {
    /// Returns true if the body was saved.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self.outcome, Outcome::Saved { .. })
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// One entry per input URL.
    pub outcomes: Vec<FetchOutcome>,
}

impl BatchReport {
    /// Number of URLs whose body was saved.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    /// Number of URLs that were skipped.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.completed()
    }

    /// Total number of URLs processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Concurrent batch fetcher.
///
/// A semaphore permit is acquired before each fetch task is spawned and
/// released when the task ends, so at most `concurrency` fetches (and
/// pipeline runs) are in flight.
#[derive(Debug)]
pub struct FetchEngine {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl FetchEngine {
    /// Creates an engine allowing `concurrency` fetches at once.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetches every URL and writes each accepted body into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    /// Individual fetch failures do NOT cause this method to error; they are
    /// logged and recorded as [`Outcome::Failed`].
    #[instrument(skip(self, downloader, urls), fields(count = urls.len(), output_dir = %output_dir.display()))]
    pub async fn fetch_all(
        &self,
        downloader: &Downloader,
        urls: Vec<String>,
        output_dir: &Path,
    ) -> Result<BatchReport, EngineError> {
        let mut handles = Vec::with_capacity(urls.len());

        info!("starting batch");

        for url in urls {
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let downloader = downloader.clone();
            let output_dir = output_dir.to_path_buf();
            let task_url = url.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                fetch_and_save(&downloader, &task_url, &output_dir).await
            });
            handles.push((url, handle));
        }

        debug!(task_count = handles.len(), "waiting for fetches to complete");

        let mut report = BatchReport::default();
        for (url, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok((path, content_type, bytes))) => {
                    info!(url = %url, path = %path.display(), bytes, "saved");
                    Outcome::Saved {
                        path,
                        content_type,
                        bytes,
                    }
                }
                Ok(Err(e)) => {
                    warn!(url = %url, kind = e.kind(), error = %e, "skipping resource");
                    Outcome::Failed {
                        kind: e.kind(),
                        error: e.to_string(),
                    }
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "fetch task panicked");
                    Outcome::Failed {
                        kind: "task_failed",
                        error: e.to_string(),
                    }
                }
            };
            report.outcomes.push(FetchOutcome { url, outcome });
        }

        info!(
            completed = report.completed(),
            failed = report.failed(),
            total = report.total(),
            "batch complete"
        );
        Ok(report)
    }
}

async fn fetch_and_save(
    downloader: &Downloader,
    url: &str,
    output_dir: &Path,
) -> Result<(PathBuf, Option<String>, usize), DownloadError> {
    let response = downloader.fetch(url).await?;
    let content_type = response.content_type().map(str::to_string);
    let path = save_body(output_dir, url, content_type.as_deref(), &response.body).await?;
    Ok((path, content_type, response.body.len()))
}
