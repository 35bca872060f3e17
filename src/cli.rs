//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Fetch remote feeds and documents into decoded, size-bounded payloads.
///
/// Each URL is fetched, transfer-decoded, size-checked, sniffed and, when it
/// is a gzip or zip container, unpacked. Accepted bodies are written to the
/// output directory; failures are logged and skipped.
#[derive(Parser, Debug)]
#[command(name = "feed-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// URLs to fetch (reads one per line from stdin when omitted)
    pub urls: Vec<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Maximum concurrent fetches (1-100)
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: Option<u8>,

    /// Directory to write fetched bodies into
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// User-Agent sent with every request
    #[arg(long)]
    pub bot_name: Option<String>,

    /// Reject bodies larger than this many MiB after transfer decoding (1-4096)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=4096))]
    pub max_body_mib: Option<u64>,

    /// Also enforce the size ceiling on payloads extracted from gzip/zip containers
    #[arg(long)]
    pub guard_extracted: bool,

    /// Path to a config file (defaults to the XDG config location)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the batch report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}
