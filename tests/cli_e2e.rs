//! End-to-end CLI tests for the feed-downloader binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with an isolated config location so a user's config file never leaks in.
fn cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("feed-downloader").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetch remote feeds"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("feed-downloader"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_empty_stdin_exits_cleanly() {
    let home = TempDir::new().unwrap();
    cmd(&home).write_stdin("").assert().success();
}

#[test]
fn test_binary_skips_bad_urls_and_reports_json() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    cmd(&home)
        .args(["-q", "--json", "-o"])
        .arg(out.path())
        .write_stdin("# comment\nnot-a-url\n\nftp://example.com/feed.xml\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"invalid_url\""))
        .stdout(predicate::str::contains("not-a-url"))
        .stdout(predicate::str::contains("# comment").not());
}

#[test]
fn test_binary_rejects_invalid_config_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    std::fs::write(&config, "concurrency = 0\n").unwrap();
    cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg("https://example.com/feed.xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("concurrency"));
}

#[test]
fn test_binary_rejects_out_of_range_concurrency() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["-c", "0", "https://example.com/feed.xml"])
        .assert()
        .failure();
}
