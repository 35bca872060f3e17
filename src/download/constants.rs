//! Constants for the download module (timeouts, redirects, bot identity).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default whole-request timeout (5 minutes for large feeds and archives).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Maximum number of redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Content coding advertised to servers; the pipeline decodes it.
pub const ACCEPT_ENCODING_VALUE: &str = "gzip";
