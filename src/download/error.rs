//! Error types for the download module.
//!
//! Pipeline failures keep their own type ([`PipelineError`]) and are wrapped
//! here together with the URL they were raised for.

use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::PipelineError;

/// Errors that can occur while fetching a resource.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, redirect loops, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The response body was rejected by the normalization pipeline.
    #[error("rejected response from {url}: {source}")]
    Pipeline {
        /// The URL whose response was rejected.
        url: String,
        /// The pipeline failure.
        #[source]
        source: PipelineError,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    ///
    /// Only raised once the body has passed the pipeline.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while saving a fetched body.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or not http(s).
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a pipeline rejection error.
    pub fn pipeline(url: impl Into<String>, source: PipelineError) -> Self {
        Self::Pipeline {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Maps a reqwest send/read error, separating timeouts.
    pub(crate) fn from_transport(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::network(url, source)
        }
    }

    /// Returns a short machine-readable label for reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClientBuild { .. } => "client_build",
            Self::Network { .. } => "network",
            Self::Timeout { .. } => "timeout",
            Self::Pipeline { source, .. } => source.kind(),
            Self::HttpStatus { .. } => "http_status",
            Self::Io { .. } => "io",
            Self::InvalidUrl { .. } => "invalid_url",
        }
    }
}

// No `From<reqwest::Error>` / `From<PipelineError>`: every variant needs the URL or path.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let error = DownloadError::http_status("https://example.com/feed.xml", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(
            msg.contains("https://example.com/feed.xml"),
            "Expected URL in: {msg}"
        );
        assert_eq!(error.kind(), "http_status");
    }

    #[test]
    fn test_pipeline_display_and_kind_delegate_to_source() {
        let error = DownloadError::pipeline(
            "https://example.com/dump.zip",
            PipelineError::multi_entry_archive(3),
        );
        let msg = error.to_string();
        assert!(msg.contains("https://example.com/dump.zip"), "Expected URL in: {msg}");
        assert!(msg.contains("3 entries"), "Expected cause in: {msg}");
        assert_eq!(error.kind(), "multi_entry_archive");
    }

    #[test]
    fn test_timeout_display() {
        let error = DownloadError::timeout("https://example.com/slow");
        assert!(error.to_string().contains("timeout"));
        assert_eq!(error.kind(), "timeout");
    }

    #[test]
    fn test_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = DownloadError::io(PathBuf::from("/tmp/out.xml"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/out.xml"), "Expected path in: {msg}");
        assert_eq!(error.kind(), "io");
    }

    #[test]
    fn test_invalid_url_display() {
        let error = DownloadError::invalid_url("not-a-url");
        let msg = error.to_string();
        assert!(msg.contains("invalid URL"), "Expected 'invalid URL' in: {msg}");
        assert!(msg.contains("not-a-url"), "Expected URL in: {msg}");
    }
}
