//! Hard ceiling on the decoded body size.

use tracing::warn;

use super::ResponseFilter;
use super::constants::MAX_BODY_BYTES;
use super::context::ResponseContext;
use super::error::PipelineError;

/// Rejects bodies longer than `limit` bytes.
///
/// Placed after transfer decoding so the bound applies to the bytes the
/// caller will actually hold, and before container extraction.
#[derive(Debug, Clone, Copy)]
pub struct SizeGuard {
    limit: usize,
}

impl Default for SizeGuard {
    fn default() -> Self {
        Self::new(MAX_BODY_BYTES)
    }
}

impl SizeGuard {
    /// Stage name used in logs and errors.
    pub const NAME: &'static str = "size_guard";

    /// Creates a guard with the given ceiling in bytes.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Returns the configured ceiling.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl ResponseFilter for SizeGuard {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, ctx: &mut ResponseContext) -> Result<(), PipelineError> {
        let actual = ctx.body.len();
        if actual > self.limit {
            warn!(actual, limit = self.limit, "response body over size ceiling");
            return Err(PipelineError::too_large(actual, self.limit));
        }
        Ok(())
    }
}
