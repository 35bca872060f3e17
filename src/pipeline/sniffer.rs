//! Magic-byte correction of uninformative content types.

use tracing::debug;

use super::ResponseFilter;
use super::constants::{GZIP_MAGIC, OCTET_STREAM, SNIFF_LEN, X_GZIP, ZIP, ZIP_MAGIC};
use super::context::ResponseContext;
use super::error::PipelineError;

/// Relabels `application/octet-stream` bodies that are really gzip or zip files.
///
/// Only the declared type is touched; the body is never modified. Declared
/// types other than octet-stream are trusted as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeSniffer;

impl TypeSniffer {
    /// Stage name used in logs and errors.
    pub const NAME: &'static str = "type_sniffer";

    /// Returns the container type implied by the leading bytes, if any.
    ///
    /// gzip takes priority over zip.
    #[must_use]
    pub fn sniff(body: &[u8]) -> Option<&'static str> {
        let head = &body[..body.len().min(SNIFF_LEN)];
        if head.starts_with(GZIP_MAGIC) {
            Some(X_GZIP)
        } else if head.starts_with(ZIP_MAGIC) {
            Some(ZIP)
        } else {
            None
        }
    }
}

impl ResponseFilter for TypeSniffer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, ctx: &mut ResponseContext) -> Result<(), PipelineError> {
        if ctx.media_type().as_deref() != Some(OCTET_STREAM) {
            return Ok(());
        }
        if let Some(sniffed) = Self::sniff(&ctx.body) {
            debug!(content_type = sniffed, "sniffed container type");
            ctx.set_content_type(sniffed);
        }
        Ok(())
    }
}
