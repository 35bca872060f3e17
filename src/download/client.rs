//! HTTP fetcher that runs every response through the normalization pipeline.
//!
//! The transport is configured without automatic decompression so that
//! `Content-Encoding` reaches the [`Pipeline`] untouched. Redirects are
//! followed by reqwest before the pipeline sees the response, and the
//! status check runs after it, so decode/size/archive failures surface even
//! for error responses.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT_ENCODING, CONTENT_TYPE, HeaderMap};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{ACCEPT_ENCODING_VALUE, CONNECT_TIMEOUT_SECS, MAX_REDIRECTS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::pipeline::{Pipeline, PipelineConfig, ResponseContext};
use crate::user_agent;

/// Settings for a [`Downloader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderConfig {
    /// User-Agent sent with every request.
    pub bot_name: String,
    /// Pipeline settings (size ceiling, extracted-size guard).
    pub pipeline: PipelineConfig,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds, body included.
    pub read_timeout_secs: u64,
    /// Redirects followed before the request fails.
    pub max_redirects: usize,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            bot_name: user_agent::default_bot_name(),
            pipeline: PipelineConfig::default(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            max_redirects: MAX_REDIRECTS,
        }
    }
}

/// A response that passed the pipeline and the status check.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// URL of the final response after redirects.
    pub url: String,
    /// Final HTTP status (always 2xx).
    pub status: StatusCode,
    /// Headers as rewritten by the pipeline.
    pub headers: HeaderMap,
    /// Decoded, size-checked and, where applicable, extracted body.
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// Returns the final `Content-Type`, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

/// HTTP fetcher with a shared response pipeline.
///
/// Cheap to clone; clones share the connection pool and the pipeline.
///
/// # Example
///
/// ```no_run
/// use feed_downloader::download::{Downloader, DownloaderConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = Downloader::new(DownloaderConfig::default())?;
/// let body = downloader.download("https://example.com/feed.xml.gz").await?;
/// println!("{} bytes", body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    pipeline: Arc<Pipeline>,
}

impl Downloader {
    /// Creates a downloader with the standard pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    #[instrument(level = "debug", skip(config), fields(bot_name = %config.bot_name))]
    pub fn new(config: DownloaderConfig) -> Result<Self, DownloadError> {
        let pipeline = Pipeline::new(&config.pipeline);
        Self::with_pipeline(&config, pipeline)
    }

    /// Creates a downloader with a caller-supplied pipeline.
    ///
    /// The pipeline settings in `config` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the HTTP client cannot be built.
    pub fn with_pipeline(config: &DownloaderConfig, pipeline: Pipeline) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(config.bot_name.clone())
            .build()
            .map_err(|source| DownloadError::ClientBuild { source })?;

        debug!(stages = ?pipeline.stage_names(), "downloader ready");
        Ok(Self {
            client,
            pipeline: Arc::new(pipeline),
        })
    }

    /// Returns the pipeline applied to every response.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Fetches `url` and returns the normalized response.
    ///
    /// Order of operations: request (redirects followed by the transport),
    /// read body, run the pipeline regardless of status, then reject non-2xx.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::InvalidUrl`] for unparseable or non-http(s) URLs
    /// - [`DownloadError::Network`] / [`DownloadError::Timeout`] for transport failures
    /// - [`DownloadError::Pipeline`] when the body is rejected by a pipeline stage
    /// - [`DownloadError::HttpStatus`] for non-2xx responses whose body passed the pipeline
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<FetchedResponse, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DownloadError::invalid_url(url));
        }

        let response = self
            .client
            .get(parsed)
            .header(ACCEPT_ENCODING, ACCEPT_ENCODING_VALUE)
            .send()
            .await
            .map_err(|e| DownloadError::from_transport(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();
        let headers = response.headers().clone();
        let body = read_body(response, url).await?;
        debug!(status = status.as_u16(), wire_bytes = body.len(), "response received");

        let mut ctx = ResponseContext::new(status, headers, body);
        self.pipeline
            .run(&mut ctx)
            .map_err(|e| DownloadError::pipeline(url, e))?;

        if !ctx.status.is_success() {
            return Err(DownloadError::http_status(url, ctx.status.as_u16()));
        }

        info!(
            final_url = %final_url,
            bytes = ctx.body.len(),
            content_type = ctx.content_type().unwrap_or("-"),
            "fetch complete"
        );

        Ok(FetchedResponse {
            url: final_url,
            status: ctx.status,
            headers: ctx.headers,
            body: ctx.body,
        })
    }

    /// Fetches `url` and returns only the normalized body.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`fetch`](Self::fetch).
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        Ok(self.fetch(url).await?.body)
    }
}

/// Collects the (already de-chunked) response body.
async fn read_body(response: reqwest::Response, url: &str) -> Result<Vec<u8>, DownloadError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::from_transport(url, e))?;
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
