//! Feed Downloader Core Library
//!
//! Fetches remote feeds and documents and turns each response, however it
//! was encoded or packaged, into a decoded, size-bounded, correctly labeled
//! byte payload.
//!
//! # Architecture
//!
//! - [`pipeline`] - ordered response filters (transfer decoding, size guard,
//!   type sniffing, container extraction)
//! - [`download`] - reqwest-based fetcher that runs the pipeline on every
//!   response, plus a concurrent batch engine
//! - [`user_agent`] - default bot identity

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod pipeline;
pub mod user_agent;

// Re-export commonly used types
pub use download::{
    BatchReport, DEFAULT_CONCURRENCY, DownloadError, Downloader, DownloaderConfig, EngineError,
    FetchEngine, FetchedResponse,
};
pub use pipeline::{
    ArchiveExtractor, MAX_BODY_BYTES, Pipeline, PipelineConfig, PipelineError, ResponseContext,
    ResponseFilter, SizeGuard, TransferDecoder, TypeSniffer,
};
