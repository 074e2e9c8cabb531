//! Exit statuses and console output of the `dirfeed` binary.

use std::fs::File;
use std::path::Path;
use std::process::{Command, Output};

use chrono::Utc;
use tempfile::tempdir;

const EMPTY_WARNING: &str = "** Warning: generated podcast found no episodes.";

fn dirfeed(media_dir: &Path, cache_dir: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dirfeed"))
        .arg(media_dir)
        .arg("--cache-dir")
        .arg(cache_dir)
        .arg("--quiet")
        .args(extra)
        .output()
        .unwrap()
}

fn cached_documents(cache_dir: &Path) -> usize {
    match std::fs::read_dir(cache_dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "xml"))
            .count(),
        Err(_) => 0,
    }
}

fn write_episode(path: &Path) {
    std::fs::write(path, b"ID3 audio").unwrap();
    let an_hour_ago = Utc::now() - chrono::Duration::hours(1);
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(an_hour_ago.into())
        .unwrap();
}

#[test]
fn empty_directory_warns_and_still_writes_the_feed() {
    let media = tempdir().unwrap();
    let cache = tempdir().unwrap();

    let output = dirfeed(media.path(), cache.path(), &[]);

    assert_eq!(output.status.code(), Some(255));
    assert!(String::from_utf8_lossy(&output.stderr).contains(EMPTY_WARNING));
    let channel = rss::Channel::read_from(&output.stdout[..]).unwrap();
    assert!(channel.items().is_empty());
    assert_eq!(cached_documents(cache.path()), 1);
}

#[test]
fn empty_directory_is_fatal_with_empty_is_error() {
    let media = tempdir().unwrap();
    let cache = tempdir().unwrap();

    let output = dirfeed(media.path(), cache.path(), &["--empty-is-error"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!String::from_utf8_lossy(&output.stderr).contains(EMPTY_WARNING));
    assert_eq!(cached_documents(cache.path()), 0);
}

#[test]
fn directory_with_episodes_succeeds() {
    let media = tempdir().unwrap();
    let cache = tempdir().unwrap();
    write_episode(&media.path().join("episode_one.mp3"));

    let output = dirfeed(media.path(), cache.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    assert!(!String::from_utf8_lossy(&output.stderr).contains(EMPTY_WARNING));
    let channel = rss::Channel::read_from(&output.stdout[..]).unwrap();
    assert_eq!(channel.items().len(), 1);
    assert_eq!(channel.items()[0].title(), Some("episode one"));
}

#[test]
fn output_flag_writes_the_file() {
    let media = tempdir().unwrap();
    let cache = tempdir().unwrap();
    write_episode(&media.path().join("episode.mp3"));
    let target = cache.path().join("feed.rss");

    let output = dirfeed(
        media.path(),
        cache.path(),
        &["-o", target.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Writing RSS to: "));
    let channel = rss::Channel::read_from(&std::fs::read(&target).unwrap()[..]).unwrap();
    assert_eq!(channel.items().len(), 1);
}

#[test]
fn unknown_description_source_is_rejected() {
    let media = tempdir().unwrap();
    let cache = tempdir().unwrap();

    let output = dirfeed(media.path(), cache.path(), &["--description-source", "summary"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("summary"));
}
