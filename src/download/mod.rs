//! HTTP fetching around the response pipeline.
//!
//! [`Downloader`] wraps a reqwest client: it follows redirects, reads the
//! whole body, hands it to the [`Pipeline`](crate::pipeline::Pipeline) and
//! only then rejects non-2xx statuses. [`FetchEngine`] runs many fetches
//! concurrently and records per-URL outcomes, skipping failures.
//!
//! # Example
//!
//! ```no_run
//! use feed_downloader::download::{Downloader, DownloaderConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new(DownloaderConfig::default())?;
//! let response = downloader.fetch("https://example.com/export.zip").await?;
//! println!("{:?}: {} bytes", response.content_type(), response.body.len());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod engine;
mod error;
mod output;

pub use client::{Downloader, DownloaderConfig, FetchedResponse};
pub use engine::{BatchReport, DEFAULT_CONCURRENCY, EngineError, FetchEngine, FetchOutcome, Outcome};
pub use error::DownloadError;
pub use output::output_file_name;

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
