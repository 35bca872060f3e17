//! Error types for the response pipeline.

use thiserror::Error;

/// Compressed format a decode failure was reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// gzip stream (transfer encoding or container).
    Gzip,
    /// zlib or raw deflate stream.
    Deflate,
    /// zip archive.
    Zip,
}

impl Format {
    /// Returns the lowercase label used in messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            Self::Zip => "zip",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised by pipeline stages.
///
/// Every variant is terminal for the response it was raised on.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The body claimed a compressed format but was not a valid stream of it.
    #[error("invalid {format} data in {stage}: {source}")]
    Decode {
        /// The stage that attempted the decode.
        stage: &'static str,
        /// The declared format.
        format: Format,
        /// The underlying decoder error.
        #[source]
        source: std::io::Error,
    },

    /// The decoded body is larger than the configured ceiling.
    #[error("response body too large: {actual} bytes (limit {limit})")]
    TooLarge {
        /// Observed body length.
        actual: usize,
        /// Configured ceiling.
        limit: usize,
    },

    /// A zip container held more than one entry.
    #[error("zip archive has {entries} entries, expected exactly one")]
    MultiEntryArchive {
        /// Number of entries found in the archive.
        entries: usize,
    },
}

impl PipelineError {
    /// Creates a decode error.
    pub fn decode(stage: &'static str, format: Format, source: std::io::Error) -> Self {
        Self::Decode {
            stage,
            format,
            source,
        }
    }

    /// Creates a size ceiling error.
    #[must_use]
    pub fn too_large(actual: usize, limit: usize) -> Self {
        Self::TooLarge { actual, limit }
    }

    /// Creates a multi-entry archive error.
    #[must_use]
    pub fn multi_entry_archive(entries: usize) -> Self {
        Self::MultiEntryArchive { entries }
    }

    /// Returns a short machine-readable label for the failure kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode",
            Self::TooLarge { .. } => "too_large",
            Self::MultiEntryArchive { .. } => "multi_entry_archive",
        }
    }
}
