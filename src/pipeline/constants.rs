//! Constants shared by the response pipeline stages.

/// Default ceiling for a decoded response body (300 MiB).
pub const MAX_BODY_BYTES: usize = 300 * 1_048_576;

/// Leading bytes of a gzip member using the deflate method.
pub const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B, 0x08];

/// Leading bytes of a zip local file header.
pub const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// Number of leading body bytes inspected when sniffing.
pub const SNIFF_LEN: usize = 6;

/// Declared type that carries no information about the payload.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Label assigned to sniffed gzip containers.
pub const X_GZIP: &str = "application/x-gzip";

/// Alternate gzip container label accepted by the extractor.
pub const GZIP: &str = "application/gzip";

/// Label assigned to sniffed zip containers.
pub const ZIP: &str = "application/zip";

/// Alternate zip container label accepted by the extractor.
pub const X_ZIP_COMPRESSED: &str = "application/x-zip-compressed";

/// Label given to extracted container payloads (feeds and documents).
pub const XML: &str = "application/xml";
