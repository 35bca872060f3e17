//! Transfer-level `Content-Encoding` decoding.

use reqwest::header::{CONTENT_ENCODING, CONTENT_LENGTH};
use tracing::debug;

use super::codec::{gunzip, inflate};
use super::context::ResponseContext;
use super::error::{Format, PipelineError};
use super::ResponseFilter;

/// Undoes a `gzip` or `deflate` content coding applied by the server.
///
/// Other codings (and a missing header) are left alone. After a successful
/// decode the `Content-Encoding` header is removed so that later stages do
/// not interpret it again, together with the `Content-Length` that described
/// the encoded bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferDecoder;

impl TransferDecoder {
    /// Stage name used in logs and errors.
    pub const NAME: &'static str = "transfer_decoder";

    fn encoding(ctx: &ResponseContext) -> Option<Format> {
        let value = ctx.headers.get(CONTENT_ENCODING)?.to_str().ok()?;
        match value.trim().to_ascii_lowercase().as_str() {
            "gzip" | "x-gzip" => Some(Format::Gzip),
            "deflate" => Some(Format::Deflate),
            _ => None,
        }
    }
}

impl ResponseFilter for TransferDecoder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, ctx: &mut ResponseContext) -> Result<(), PipelineError> {
        let Some(format) = Self::encoding(ctx) else {
            return Ok(());
        };

        let encoded_len = ctx.body.len();
        let decoded = match format {
            Format::Gzip => gunzip(&ctx.body),
            _ => inflate(&ctx.body),
        }
        .map_err(|e| PipelineError::decode(Self::NAME, format, e))?;

        debug!(
            encoding = %format,
            encoded_bytes = encoded_len,
            decoded_bytes = decoded.len(),
            "decoded transfer encoding"
        );
        ctx.replace_body(decoded);
        ctx.headers.remove(CONTENT_ENCODING);
        ctx.headers.remove(CONTENT_LENGTH);
        Ok(())
    }
}
