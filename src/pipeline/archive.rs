//! Extraction of gzip and zip container bodies.

use std::io::{self, Cursor, Read};

use tracing::debug;
use zip::ZipArchive;

use super::ResponseFilter;
use super::codec::gunzip;
use super::constants::{GZIP, X_GZIP, X_ZIP_COMPRESSED, XML, ZIP};
use super::context::ResponseContext;
use super::error::{Format, PipelineError};

/// Replaces a gzip or zip container body with the document it holds.
///
/// The extracted payload is always relabeled `application/xml`: the only
/// payloads this downloader fetches in containers are feeds and documents.
///
/// Zip archives must hold exactly one entry. An archive with no entries is
/// passed through untouched. An archive with more than one entry fails with
/// [`PipelineError::MultiEntryArchive`] *after* the first entry has been
/// written into the body, so the body must not be used when that error is
/// returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

enum Container {
    Gzip,
    Zip,
}

impl ArchiveExtractor {
    /// Stage name used in logs and errors.
    pub const NAME: &'static str = "archive_extractor";

    fn container(ctx: &ResponseContext) -> Option<Container> {
        match ctx.media_type()?.as_str() {
            X_GZIP | GZIP => Some(Container::Gzip),
            ZIP | X_ZIP_COMPRESSED => Some(Container::Zip),
            _ => None,
        }
    }

    fn extract_gzip(ctx: &mut ResponseContext) -> Result<(), PipelineError> {
        let decoded =
            gunzip(&ctx.body).map_err(|e| PipelineError::decode(Self::NAME, Format::Gzip, e))?;
        debug!(
            container = "gzip",
            compressed_bytes = ctx.body.len(),
            extracted_bytes = decoded.len(),
            "extracted container"
        );
        ctx.replace_body(decoded);
        ctx.set_content_type(XML);
        Ok(())
    }

    fn extract_zip(ctx: &mut ResponseContext) -> Result<(), PipelineError> {
        let (entries, extracted) = {
            let mut archive = ZipArchive::new(Cursor::new(ctx.body.as_slice()))
                .map_err(|e| zip_error(io::Error::other(e)))?;
            if archive.is_empty() {
                debug!("zip archive has no entries, leaving body unchanged");
                return Ok(());
            }

            let mut entry = archive
                .by_index(0)
                .map_err(|e| zip_error(io::Error::other(e)))?;
            let mut extracted = Vec::new();
            entry.read_to_end(&mut extracted).map_err(zip_error)?;
            debug!(
                container = "zip",
                entry = entry.name(),
                compressed_bytes = ctx.body.len(),
                extracted_bytes = extracted.len(),
                "extracted container"
            );
            drop(entry);
            (archive.len(), extracted)
        };

        ctx.replace_body(extracted);
        ctx.set_content_type(XML);

        if entries > 1 {
            return Err(PipelineError::multi_entry_archive(entries));
        }
        Ok(())
    }
}

fn zip_error(source: io::Error) -> PipelineError {
    PipelineError::decode(ArchiveExtractor::NAME, Format::Zip, source)
}

impl ResponseFilter for ArchiveExtractor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, ctx: &mut ResponseContext) -> Result<(), PipelineError> {
        match Self::container(ctx) {
            Some(Container::Gzip) => Self::extract_gzip(ctx),
            Some(Container::Zip) => Self::extract_zip(ctx),
            None => Ok(()),
        }
    }
}
