//! CLI entry point for the feed downloader.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use feed_downloader::{
    DEFAULT_CONCURRENCY, Downloader, DownloaderConfig, FetchEngine, MAX_BODY_BYTES,
    PipelineConfig,
};
use tracing::{debug, info};

mod app_config;
mod cli;

use app_config::FileConfig;
use cli::Args;

const BYTES_PER_MIB: u64 = 1_048_576;

/// Effective settings after merging CLI flags over the config file.
#[derive(Debug)]
struct Settings {
    downloader: DownloaderConfig,
    concurrency: usize,
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let file_config = app_config::load_file_config(args.config.as_deref())?;
    if file_config.is_some() {
        debug!("loaded config file");
    }
    let settings = resolve_settings(&args, file_config.unwrap_or_default())?;

    let input_text = if !args.urls.is_empty() {
        args.urls.join("\n")
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        info!("No input provided. Pipe URLs via stdin or pass as arguments.");
        info!("Example: echo 'https://example.com/feed.xml.gz' | feed-downloader -o feeds");
        return Ok(());
    };

    let urls = parse_url_lines(&input_text);
    if urls.is_empty() {
        info!("No URLs found in input");
        return Ok(());
    }
    info!(urls = urls.len(), "Parsed input");

    tokio::fs::create_dir_all(&settings.output_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create output directory '{}'",
                settings.output_dir.display()
            )
        })?;

    let downloader =
        Downloader::new(settings.downloader).context("Failed to initialize downloader")?;
    let engine = FetchEngine::new(settings.concurrency)?;

    let report = engine
        .fetch_all(&downloader, urls, &settings.output_dir)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    info!(
        completed = report.completed(),
        failed = report.failed(),
        total = report.total(),
        "Fetch complete"
    );

    Ok(())
}

/// Merges CLI flags over file values over built-in defaults.
fn resolve_settings(args: &Args, file: FileConfig) -> Result<Settings> {
    let mut downloader = DownloaderConfig::default();

    if let Some(bot_name) = args.bot_name.clone().or(file.bot_name) {
        downloader.bot_name = bot_name;
    }

    let max_body_bytes = match args.max_body_mib.or(file.max_body_mib) {
        Some(mib) => usize::try_from(mib.saturating_mul(BYTES_PER_MIB))
            .context("max_body_mib does not fit in memory on this platform")?,
        None => MAX_BODY_BYTES,
    };
    downloader.pipeline = PipelineConfig {
        max_body_bytes,
        guard_extracted_size: args.guard_extracted || file.guard_extracted_size.unwrap_or(false),
    };

    if let Some(secs) = file.connect_timeout_secs {
        downloader.connect_timeout_secs = secs;
    }
    if let Some(secs) = file.read_timeout_secs {
        downloader.read_timeout_secs = secs;
    }

    let concurrency = args
        .concurrency
        .or(file.concurrency)
        .map_or(DEFAULT_CONCURRENCY, usize::from);

    let output_dir = args
        .output_dir
        .clone()
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(Settings {
        downloader,
        concurrency,
        output_dir,
    })
}

/// One URL per line; blank lines and `#` comments are ignored.
fn parse_url_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["feed-downloader"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_url_lines_skips_blanks_and_comments() {
        let urls = parse_url_lines("  https://a/x.xml \n\n# note\nhttps://b/y.zip\n");
        assert_eq!(urls, ["https://a/x.xml", "https://b/y.zip"]);
    }

    #[test]
    fn test_resolve_settings_defaults() {
        let settings = resolve_settings(&args(&[]), FileConfig::default()).unwrap();
        assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert_eq!(settings.downloader.pipeline, PipelineConfig::default());
        assert!(settings.downloader.bot_name.starts_with("feed-downloader/"));
    }

    #[test]
    fn test_resolve_settings_file_values_apply() {
        let file = FileConfig {
            bot_name: Some("filebot".into()),
            max_body_mib: Some(2),
            guard_extracted_size: Some(true),
            concurrency: Some(9),
            connect_timeout_secs: Some(5),
            read_timeout_secs: Some(60),
            output_dir: Some(PathBuf::from("/srv/feeds")),
        };
        let settings = resolve_settings(&args(&[]), file).unwrap();
        assert_eq!(settings.downloader.bot_name, "filebot");
        assert_eq!(settings.downloader.pipeline.max_body_bytes, 2 * 1_048_576);
        assert!(settings.downloader.pipeline.guard_extracted_size);
        assert_eq!(settings.downloader.connect_timeout_secs, 5);
        assert_eq!(settings.downloader.read_timeout_secs, 60);
        assert_eq!(settings.concurrency, 9);
        assert_eq!(settings.output_dir, PathBuf::from("/srv/feeds"));
    }

    #[test]
    fn test_resolve_settings_cli_overrides_file() {
        let file = FileConfig {
            bot_name: Some("filebot".into()),
            max_body_mib: Some(2),
            concurrency: Some(9),
            ..FileConfig::default()
        };
        let settings = resolve_settings(
            &args(&["--bot-name", "clibot", "--max-body-mib", "1", "-c", "3"]),
            file,
        )
        .unwrap();
        assert_eq!(settings.downloader.bot_name, "clibot");
        assert_eq!(settings.downloader.pipeline.max_body_bytes, 1_048_576);
        assert_eq!(settings.concurrency, 3);
    }
}
