//! Default bot identity sent as the User-Agent of every fetch.

/// Product token used when no bot name is configured.
const PRODUCT: &str = "feed-downloader";

/// Default bot name: product token plus crate version.
#[must_use]
pub fn default_bot_name() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{PRODUCT}/{version}")
}
