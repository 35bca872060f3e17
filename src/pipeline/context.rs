//! Mutable response state threaded through the pipeline stages.

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

/// A completed HTTP response as seen by the pipeline.
///
/// Header names are case-insensitive (`HeaderMap`). Each stage may replace
/// `body` and rewrite headers in place; the context is owned by a single
/// pipeline invocation and never shared between responses.
#[derive(Debug, Clone)]
pub struct ResponseContext {
    /// HTTP status as received from the transport.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl ResponseContext {
    /// Creates a context from transport output.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Creates a `200 OK` context with the given declared content type.
    ///
    /// Mostly useful when feeding bytes that did not come from a live response.
    #[must_use]
    pub fn with_content_type(content_type: &'static str, body: Vec<u8>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self::new(StatusCode::OK, headers, body)
    }

    /// Returns the raw `Content-Type` value, if present and valid ASCII.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Returns the lowercased media type without parameters.
    ///
    /// `Application/Zip; name="feed.zip"` becomes `application/zip`.
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        let raw = self.content_type()?;
        let essence = raw.split(';').next().unwrap_or(raw).trim();
        if essence.is_empty() {
            None
        } else {
            Some(essence.to_ascii_lowercase())
        }
    }

    /// Replaces the `Content-Type` header.
    pub fn set_content_type(&mut self, content_type: &'static str) {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    /// Swaps in a new body, dropping the superseded buffer.
    pub fn replace_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }
}
