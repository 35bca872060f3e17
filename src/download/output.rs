//! Naming and writing of fetched bodies on disk.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use super::error::DownloadError;

/// Maps a content type to a file extension (with leading dot).
///
/// Parameters and case are ignored; unknown types get `.bin`.
pub(crate) fn extension_from_content_type(content_type: &str) -> &'static str {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    match mime.as_str() {
        "application/xml" | "text/xml" => ".xml",
        "application/rss+xml" => ".rss",
        "application/atom+xml" => ".atom",
        "text/html" => ".html",
        "text/plain" => ".txt",
        "application/json" => ".json",
        "application/zip" | "application/x-zip-compressed" => ".zip",
        "application/gzip" | "application/x-gzip" => ".gz",
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        _ => ".bin",
    }
}

/// Stable output file name: SHA-256 of the requested URL plus an extension.
///
/// Naming by the requested URL (not the final one) keeps reruns of the same
/// input list writing to the same files.
#[must_use]
pub fn output_file_name(url: &str, content_type: Option<&str>) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let ext = content_type.map_or(".bin", extension_from_content_type);
    format!("{digest:x}{ext}")
}

/// Writes `body` into `output_dir`, returning the file path.
pub(crate) async fn save_body(
    output_dir: &Path,
    url: &str,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<PathBuf, DownloadError> {
    let path = output_dir.join(output_file_name(url, content_type));
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| DownloadError::io(path.clone(), e))?;
    file.write_all(body)
        .await
        .map_err(|e| DownloadError::io(path.clone(), e))?;
    file.flush()
        .await
        .map_err(|e| DownloadError::io(path.clone(), e))?;
    Ok(path)
}
