//! Response-normalization pipeline.
//!
//! Every completed response passes through an ordered list of
//! [`ResponseFilter`]s before the caller sees it. The standard order is:
//!
//! 1. [`TransferDecoder`] - undo `Content-Encoding: gzip|deflate`
//! 2. [`SizeGuard`] - reject bodies over the ceiling (300 MiB by default)
//! 3. [`TypeSniffer`] - relabel `application/octet-stream` gzip/zip bodies
//! 4. [`ArchiveExtractor`] - unpack gzip/zip containers into their document
//!
//! Decoding precedes the size check so the ceiling bounds the bytes actually
//! held in memory; the size check and the sniffer both precede extraction so
//! oversized or mislabeled containers are handled before they are unpacked.
//!
//! # Example
//!
//! ```
//! use feed_downloader::pipeline::{Pipeline, PipelineConfig, ResponseContext};
//!
//! let pipeline = Pipeline::new(&PipelineConfig::default());
//! let mut ctx = ResponseContext::with_content_type("text/xml", b"<rss/>".to_vec());
//! pipeline.run(&mut ctx).unwrap();
//! assert_eq!(ctx.body, b"<rss/>");
//! ```

mod archive;
mod codec;
pub mod constants;
mod context;
mod error;
mod size_guard;
mod sniffer;
mod transfer;

use tracing::{trace, warn};

pub use archive::ArchiveExtractor;
pub use constants::MAX_BODY_BYTES;
pub use context::ResponseContext;
pub use error::{Format, PipelineError};
pub use size_guard::SizeGuard;
pub use sniffer::TypeSniffer;
pub use transfer::TransferDecoder;

/// A single response transformation.
///
/// Filters hold no per-response state; the same instance is applied to many
/// responses, possibly from several threads at once.
pub trait ResponseFilter: Send + Sync + std::fmt::Debug {
    /// Stable stage name used in logs and ordering checks.
    fn name(&self) -> &'static str;

    /// Transforms `ctx` in place.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the response must be rejected.
    fn apply(&self, ctx: &mut ResponseContext) -> Result<(), PipelineError>;
}

/// Settings for building the standard pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Ceiling for decoded bodies in bytes.
    pub max_body_bytes: usize,
    /// Run a second size check on the payload pulled out of a container.
    ///
    /// Off by default: the ceiling normally applies to the container as
    /// received, and an extracted entry may be larger.
    pub guard_extracted_size: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: MAX_BODY_BYTES,
            guard_extracted_size: false,
        }
    }
}

/// Ordered chain of response filters.
#[derive(Debug)]
pub struct Pipeline {
    filters: Vec<Box<dyn ResponseFilter>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

impl Pipeline {
    /// Builds the standard four-stage pipeline.
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        let mut filters: Vec<Box<dyn ResponseFilter>> = vec![
            Box::new(TransferDecoder),
            Box::new(SizeGuard::new(config.max_body_bytes)),
            Box::new(TypeSniffer),
            Box::new(ArchiveExtractor),
        ];
        if config.guard_extracted_size {
            filters.push(Box::new(SizeGuard::new(config.max_body_bytes)));
        }
        Self { filters }
    }

    /// Builds a pipeline from an explicit filter order.
    #[must_use]
    pub fn from_filters(filters: Vec<Box<dyn ResponseFilter>>) -> Self {
        Self { filters }
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Runs every stage in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`PipelineError`] raised by a stage. The context is
    /// left in whatever state that stage produced and must not be trusted.
    pub fn run(&self, ctx: &mut ResponseContext) -> Result<(), PipelineError> {
        for filter in &self.filters {
            let before = ctx.body.len();
            if let Err(error) = filter.apply(ctx) {
                warn!(stage = filter.name(), kind = error.kind(), %error, "response rejected");
                return Err(error);
            }
            trace!(
                stage = filter.name(),
                bytes_in = before,
                bytes_out = ctx.body.len(),
                "stage complete"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::{Cursor, Write};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use reqwest::header::{CONTENT_ENCODING, HeaderValue};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn single_entry_zip(data: &[u8]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("feed.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[derive(Debug)]
    struct Counting {
        name: &'static str,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl ResponseFilter for Counting {
        fn name(&self) -> &'static str {
            self.name
        }

        fn apply(&self, _ctx: &mut ResponseContext) -> Result<(), PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PipelineError::multi_entry_archive(2))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_standard_order() {
        let pipeline = Pipeline::default();
        assert_eq!(
            pipeline.stage_names(),
            [
                "transfer_decoder",
                "size_guard",
                "type_sniffer",
                "archive_extractor"
            ]
        );
    }

    #[test]
    fn test_guard_extracted_size_appends_second_guard() {
        let pipeline = Pipeline::new(&PipelineConfig {
            guard_extracted_size: true,
            ..PipelineConfig::default()
        });
        assert_eq!(pipeline.stage_names().last(), Some(&"size_guard"));
        assert_eq!(pipeline.stage_names().len(), 5);
    }

    #[test]
    fn test_first_failure_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let after = Arc::new(AtomicUsize::new(0));
        let filters: Vec<Box<dyn ResponseFilter>> = vec![
            Box::new(Counting {
                name: "first",
                calls: Arc::clone(&calls),
                fail: true,
            }),
            Box::new(Counting {
                name: "second",
                calls: Arc::clone(&after),
                fail: false,
            }),
        ];
        let pipeline = Pipeline::from_filters(filters);

        let mut ctx = ResponseContext::with_content_type("text/plain", Vec::new());
        assert!(pipeline.run(&mut ctx).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(after.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_transfer_gzip_over_zip_container_sniffed_from_octet_stream() {
        let mut ctx = ResponseContext::with_content_type(
            "application/octet-stream",
            gzip(&single_entry_zip(b"<a/>")),
        );
        ctx.headers
            .insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));

        Pipeline::default().run(&mut ctx).unwrap();
        assert_eq!(ctx.body, b"<a/>");
        assert_eq!(ctx.content_type(), Some("application/xml"));
        assert!(ctx.headers.get(CONTENT_ENCODING).is_none());
    }

    #[test]
    fn test_octet_stream_gzip_container_is_unpacked() {
        let mut ctx =
            ResponseContext::with_content_type("application/octet-stream", gzip(b"<feed/>"));
        Pipeline::default().run(&mut ctx).unwrap();
        assert_eq!(ctx.body, b"<feed/>");
        assert_eq!(ctx.content_type(), Some("application/xml"));
    }

    #[test]
    fn test_size_guard_stops_container_before_extraction() {
        let container = gzip(&[b'x'; 4096]);
        let limit = container.len() - 1;
        let mut ctx = ResponseContext::with_content_type("application/gzip", container.clone());

        let err = Pipeline::new(&PipelineConfig {
            max_body_bytes: limit,
            guard_extracted_size: false,
        })
        .run(&mut ctx)
        .unwrap_err();

        assert!(matches!(err, PipelineError::TooLarge { actual, .. } if actual == container.len()));
        assert_eq!(ctx.body, container);
    }

    #[test]
    fn test_extracted_payload_checked_only_when_enabled() {
        let container = gzip(&[b'x'; 4096]);
        let limit = container.len() + 1;

        let mut ctx = ResponseContext::with_content_type("application/gzip", container.clone());
        Pipeline::new(&PipelineConfig {
            max_body_bytes: limit,
            guard_extracted_size: false,
        })
        .run(&mut ctx)
        .unwrap();
        assert_eq!(ctx.body.len(), 4096);

        let mut ctx = ResponseContext::with_content_type("application/gzip", container);
        let err = Pipeline::new(&PipelineConfig {
            max_body_bytes: limit,
            guard_extracted_size: true,
        })
        .run(&mut ctx)
        .unwrap_err();
        assert!(matches!(err, PipelineError::TooLarge { actual: 4096, .. }));
    }

    #[test]
    fn test_plain_document_passes_untouched() {
        let mut ctx = ResponseContext::with_content_type("text/xml; charset=utf-8", b"<rss/>".to_vec());
        Pipeline::default().run(&mut ctx).unwrap();
        assert_eq!(ctx.body, b"<rss/>");
        assert_eq!(ctx.content_type(), Some("text/xml; charset=utf-8"));
    }
}
