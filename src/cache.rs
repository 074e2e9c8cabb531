// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File-backed cache of generated feeds with sliding expiry.
//!
//! Each directory key owns one XML file plus a small JSON sidecar. The XML
//! file's modification time is the record's `generated_at`. A record younger
//! than the minimum cache time is served as-is and its modification time is
//! bumped to now; anything older, or built under a different fingerprint, is
//! regenerated. Writes go through a temp file and a rename, so readers see
//! either the old or the new record, never a mix.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::CacheOptions;
use crate::error::{CacheError, FeedError};
use crate::feed::GeneratedFeed;
use crate::progress::{NoopReporter, ProgressEvent, SharedProgressReporter};

/// Exit status for a run that produced an empty feed
pub const EXIT_EMPTY_WARNING: i32 = 255;

// ============================================================================
// Seams
// ============================================================================

/// Anything that can regenerate a feed document on demand
pub trait FeedSource {
    /// Identity of the scanned directory
    fn cache_key(&self) -> String;

    /// Hash of the generator version and configuration that shape the output
    fn fingerprint(&self) -> String;

    /// Produce a fresh document as of `now`
    fn build(&self, now: DateTime<Utc>) -> Result<GeneratedFeed, FeedError>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// A shared reference to a clock
pub type SharedClock = Arc<dyn Clock>;

/// The system wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl SystemClock {
    pub fn shared() -> SharedClock {
        Arc::new(Self)
    }
}

// ============================================================================
// Cache records
// ============================================================================

/// A cached document for one directory key
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub bytes: Bytes,
    pub generated_at: DateTime<Utc>,
    pub fingerprint: String,
    pub episode_count: usize,
}

/// Sidecar persisted next to the cached XML
///
/// `document_sha256` ties the sidecar to the exact document it was written
/// with. A pair that does not match is not a record.
#[derive(Debug, Serialize, Deserialize)]
struct CacheMeta {
    key: String,
    fingerprint: String,
    episode_count: usize,
    document_sha256: String,
}

/// Directory holding one record per directory key
#[derive(Debug, Clone)]
pub struct CacheStore {
    directory: PathBuf,
}

impl CacheStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the cached XML document for `key`
    pub fn document_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.xml", record_stem(key)))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.meta.json", record_stem(key)))
    }

    /// Load the record for `key`, or `None` if there is no complete record
    pub fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let document_path = self.document_path(key);
        let meta_path = self.meta_path(key);

        let bytes = match std::fs::read(&document_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::ReadFailed {
                    path: document_path,
                    source: e,
                });
            }
        };

        let generated_at: DateTime<Utc> = std::fs::metadata(&document_path)
            .and_then(|m| m.modified())
            .map_err(|e| CacheError::ReadFailed {
                path: document_path.clone(),
                source: e,
            })?
            .into();

        let meta_json = match std::fs::read_to_string(&meta_path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::ReadFailed {
                    path: meta_path,
                    source: e,
                });
            }
        };

        let meta: CacheMeta =
            serde_json::from_str(&meta_json).map_err(|e| CacheError::MetaParseFailed {
                path: meta_path,
                source: e,
            })?;

        if meta.key != key {
            return Ok(None);
        }
        if meta.document_sha256 != document_digest(&bytes) {
            tracing::debug!(key = %key, "Cache document does not match its metadata");
            return Ok(None);
        }

        Ok(Some(CacheEntry {
            key: meta.key,
            bytes: Bytes::from(bytes),
            generated_at,
            fingerprint: meta.fingerprint,
            episode_count: meta.episode_count,
        }))
    }

    /// Persist `entry`, replacing any previous record for its key
    ///
    /// The document is renamed into place before the sidecar. If only one of
    /// the two renames lands, the digest check in [`CacheStore::load`]
    /// rejects the pair.
    pub fn store(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.directory).map_err(|e| CacheError::CreateDirectoryFailed {
            path: self.directory.clone(),
            source: e,
        })?;

        let meta = CacheMeta {
            key: entry.key.clone(),
            fingerprint: entry.fingerprint.clone(),
            episode_count: entry.episode_count,
            document_sha256: document_digest(&entry.bytes),
        };
        let meta_json = serde_json::to_vec_pretty(&meta)?;

        write_atomically(
            &self.document_path(&entry.key),
            &entry.bytes,
            Some(entry.generated_at.into()),
        )?;
        write_atomically(&self.meta_path(&entry.key), &meta_json, None)
    }

    /// Mark the record for `key` as generated at `at` without rewriting it
    pub fn touch(&self, key: &str, at: DateTime<Utc>) -> Result<(), CacheError> {
        let path = self.document_path(key);
        File::options()
            .write(true)
            .open(&path)
            .and_then(|file| file.set_modified(at.into()))
            .map_err(|e| CacheError::WriteFailed { path, source: e })
    }
}

/// File name stem for `key`: readable directory name plus a hash of the full key
fn record_stem(key: &str) -> String {
    let name = Path::new(key)
        .file_name()
        .map(|n| sanitize_filename::sanitize(n.to_string_lossy()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "feed".to_string());

    let digest = Sha256::digest(key.as_bytes());
    let hash: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();

    format!("{name}-{hash}")
}

fn document_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Write `content` to a temp file next to `path`, then rename it into place
fn write_atomically(path: &Path, content: &[u8], modified: Option<SystemTime>) -> Result<(), CacheError> {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{}.{:x}", std::process::id(), suffix));

    write_via(&temp_path, path, content, modified)
}

fn write_via(
    temp_path: &Path,
    path: &Path,
    content: &[u8],
    modified: Option<SystemTime>,
) -> Result<(), CacheError> {
    // create_new refuses to follow anything already sitting at the temp path
    let mut file = File::options()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .map_err(|e| CacheError::WriteFailed {
            path: temp_path.to_path_buf(),
            source: e,
        })?;

    let write_result = (|| {
        file.write_all(content)?;
        if let Some(modified) = modified {
            file.set_modified(modified)?;
        }
        file.sync_all()?;
        drop(file);
        std::fs::rename(temp_path, path)
    })();

    write_result.map_err(|e| {
        let _ = std::fs::remove_file(temp_path);
        CacheError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

// ============================================================================
// Cached feed
// ============================================================================

/// How a response was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from a record younger than the minimum cache time
    Fresh,
    /// No usable record existed
    Missing,
    /// The record was at least the minimum cache time old
    Stale,
    /// The record was built under a different generator or configuration
    Invalidated,
}

/// Outcome category used to pick the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Success,
    /// The feed is valid but has no episodes
    EmptyWarning,
}

impl Completion {
    pub fn exit_code(self) -> i32 {
        match self {
            Completion::Success => 0,
            Completion::EmptyWarning => EXIT_EMPTY_WARNING,
        }
    }
}

/// A document handed back to the caller
#[derive(Debug)]
pub struct CachedResponse {
    pub bytes: Bytes,
    pub episode_count: usize,
    pub status: CacheStatus,
    /// The record's timestamp after this request
    pub generated_at: DateTime<Utc>,
    /// Set when a regenerated document could not be persisted
    pub write_error: Option<CacheError>,
}

impl CachedResponse {
    pub fn completion(&self) -> Completion {
        if self.episode_count == 0 {
            Completion::EmptyWarning
        } else {
            Completion::Success
        }
    }
}

/// Front door for feed requests: serves cached documents while fresh and
/// rebuilds them through the wrapped source otherwise
pub struct CachedFeed<S: FeedSource> {
    source: S,
    store: CacheStore,
    min_cache_time: Duration,
    clock: SharedClock,
    reporter: SharedProgressReporter,
}

impl<S: FeedSource> CachedFeed<S> {
    pub fn new(source: S, options: &CacheOptions) -> Self {
        Self {
            source,
            store: CacheStore::new(&options.directory),
            min_cache_time: options.min_cache_time,
            clock: SystemClock::shared(),
            reporter: NoopReporter::shared(),
        }
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_reporter(mut self, reporter: SharedProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Serve the document for the wrapped source
    ///
    /// A failed rebuild returns the error and leaves any previous record
    /// untouched. A failed cache write does not fail the request; the fresh
    /// document is returned with `write_error` set.
    pub fn get(&self) -> Result<CachedResponse, FeedError> {
        let key = self.source.cache_key();
        let now = self.clock.now();

        let existing = self.store.load(&key).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "Ignoring unreadable cache record");
            None
        });

        let status = match existing {
            None => CacheStatus::Missing,
            Some(entry) if entry.fingerprint != self.source.fingerprint() => {
                CacheStatus::Invalidated
            }
            Some(entry) => {
                let age = now
                    .signed_duration_since(entry.generated_at)
                    .to_std()
                    .unwrap_or(Duration::ZERO);

                if age < self.min_cache_time {
                    return Ok(self.serve_fresh(entry, age, now));
                }
                CacheStatus::Stale
            }
        };

        tracing::debug!(key = %key, ?status, "Rebuilding feed");
        let generated = self.source.build(now)?;

        let entry = CacheEntry {
            key: key.clone(),
            bytes: generated.bytes.clone(),
            generated_at: now,
            fingerprint: self.source.fingerprint(),
            episode_count: generated.episode_count,
        };

        let write_error = self.store.store(&entry).err();
        if let Some(e) = &write_error {
            tracing::warn!(key = %key, error = %e, "Failed to write feed cache");
            self.reporter.report(ProgressEvent::CacheWriteFailed {
                key: key.clone(),
                error: e.to_string(),
            });
        }

        self.reporter.report(ProgressEvent::CacheRebuilt {
            key,
            episodes: generated.episode_count,
        });

        Ok(CachedResponse {
            bytes: generated.bytes,
            episode_count: generated.episode_count,
            status,
            generated_at: now,
            write_error,
        })
    }

    fn serve_fresh(&self, entry: CacheEntry, age: Duration, now: DateTime<Utc>) -> CachedResponse {
        tracing::debug!(key = %entry.key, age_ms = age.as_millis() as u64, "Serving cached feed");

        let generated_at = match self.store.touch(&entry.key, now) {
            Ok(()) => now,
            Err(e) => {
                tracing::warn!(key = %entry.key, error = %e, "Failed to refresh cache timestamp");
                entry.generated_at
            }
        };

        self.reporter.report(ProgressEvent::CacheServed {
            key: entry.key,
            age,
        });

        CachedResponse {
            bytes: entry.bytes,
            episode_count: entry.episode_count,
            status: CacheStatus::Fresh,
            generated_at,
            write_error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use chrono::TimeZone;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// A clock that only moves when told to
    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new(start: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(start)))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += chrono::Duration::from_std(by).unwrap();
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    /// Embeds the build time and a build counter in every document
    struct CountingSource {
        key: String,
        fingerprint: Mutex<String>,
        builds: AtomicUsize,
        fail: AtomicBool,
        episodes: usize,
    }

    impl CountingSource {
        fn new(key: &str) -> Self {
            Self {
                key: key.to_string(),
                fingerprint: Mutex::new("v1".to_string()),
                builds: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                episodes: 2,
            }
        }

        fn builds(&self) -> usize {
            self.builds.load(Ordering::SeqCst)
        }
    }

    impl FeedSource for CountingSource {
        fn cache_key(&self) -> String {
            self.key.clone()
        }

        fn fingerprint(&self) -> String {
            self.fingerprint.lock().unwrap().clone()
        }

        fn build(&self, now: DateTime<Utc>) -> Result<GeneratedFeed, FeedError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(FeedError::Scan(ScanError::DirectoryNotFound(PathBuf::from(
                    &self.key,
                ))));
            }
            let build = self.builds.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(GeneratedFeed {
                bytes: Bytes::from(format!("<rss build=\"{build}\" at=\"{}\"/>", now.to_rfc2822())),
                episode_count: self.episodes,
            })
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    fn options(dir: &Path, secs: u64) -> CacheOptions {
        CacheOptions {
            directory: dir.join("cache"),
            min_cache_time: Duration::from_secs(secs),
        }
    }

    fn cached(
        dir: &Path,
        source: CountingSource,
        clock: &Arc<ManualClock>,
    ) -> CachedFeed<CountingSource> {
        CachedFeed::new(source, &options(dir, 5)).with_clock(clock.clone())
    }

    #[test]
    fn first_request_builds_and_stores() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        let response = feed.get().unwrap();

        assert_eq!(response.status, CacheStatus::Missing);
        assert_eq!(feed.source().builds(), 1);
        assert!(response.write_error.is_none());

        let stored = feed.store().load("/srv/show").unwrap().unwrap();
        assert_eq!(stored.bytes, response.bytes);
        assert_eq!(stored.generated_at, start());
        assert_eq!(stored.episode_count, 2);
        assert_eq!(stored.fingerprint, "v1");
    }

    #[test]
    fn fresh_request_serves_identical_bytes_and_slides_expiry() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        let first = feed.get().unwrap();
        clock.advance(Duration::from_secs(1));
        let second = feed.get().unwrap();

        assert_eq!(second.status, CacheStatus::Fresh);
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(feed.source().builds(), 1);

        let expected = start() + chrono::Duration::seconds(1);
        assert_eq!(second.generated_at, expected);
        let stored = feed.store().load("/srv/show").unwrap().unwrap();
        assert_eq!(stored.generated_at, expected);
    }

    #[test]
    fn frequent_requests_keep_record_alive_past_min_cache_time() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        feed.get().unwrap();
        for _ in 0..5 {
            clock.advance(Duration::from_secs(4));
            assert_eq!(feed.get().unwrap().status, CacheStatus::Fresh);
        }

        assert_eq!(feed.source().builds(), 1);
    }

    #[test]
    fn stale_request_rebuilds() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        let first = feed.get().unwrap();
        clock.advance(Duration::from_secs(5));
        let second = feed.get().unwrap();

        assert_eq!(second.status, CacheStatus::Stale);
        assert_eq!(feed.source().builds(), 2);
        assert_ne!(first.bytes, second.bytes);

        let stored = feed.store().load("/srv/show").unwrap().unwrap();
        assert_eq!(stored.bytes, second.bytes);
        assert_eq!(stored.generated_at, start() + chrono::Duration::seconds(5));
    }

    #[test]
    fn fingerprint_change_invalidates_fresh_record() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        feed.get().unwrap();
        *feed.source().fingerprint.lock().unwrap() = "v2".to_string();
        let response = feed.get().unwrap();

        assert_eq!(response.status, CacheStatus::Invalidated);
        assert_eq!(feed.source().builds(), 2);
        let stored = feed.store().load("/srv/show").unwrap().unwrap();
        assert_eq!(stored.fingerprint, "v2");
    }

    #[test]
    fn failed_rebuild_keeps_previous_record() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        let first = feed.get().unwrap();
        clock.advance(Duration::from_secs(60));
        feed.source().fail.store(true, Ordering::SeqCst);

        assert!(feed.get().is_err());

        let stored = feed.store().load("/srv/show").unwrap().unwrap();
        assert_eq!(stored.bytes, first.bytes);
        assert_eq!(stored.generated_at, start());
    }

    #[test]
    fn failed_first_build_writes_nothing() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let source = CountingSource::new("/srv/show");
        source.fail.store(true, Ordering::SeqCst);
        let feed = cached(dir.path(), source, &clock);

        assert!(feed.get().is_err());
        assert!(feed.store().load("/srv/show").unwrap().is_none());
    }

    #[test]
    fn cache_write_failure_still_returns_document() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("cache");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        let response = feed.get().unwrap();

        assert!(!response.bytes.is_empty());
        assert!(matches!(
            response.write_error,
            Some(CacheError::CreateDirectoryFailed { .. })
        ));
    }

    #[test]
    fn keys_do_not_share_records() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let first = cached(dir.path(), CountingSource::new("/srv/a/show"), &clock);
        let second = cached(dir.path(), CountingSource::new("/srv/b/show"), &clock);

        first.get().unwrap();
        let response = second.get().unwrap();

        assert_eq!(response.status, CacheStatus::Missing);
        assert_ne!(
            first.store().document_path("/srv/a/show"),
            second.store().document_path("/srv/b/show")
        );
    }

    #[test]
    fn one_document_per_key() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        feed.get().unwrap();
        clock.advance(Duration::from_secs(10));
        feed.get().unwrap();
        clock.advance(Duration::from_secs(10));
        feed.get().unwrap();

        let documents = std::fs::read_dir(dir.path().join("cache"))
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "xml"))
            .count();
        assert_eq!(documents, 1);
    }

    #[test]
    fn corrupt_metadata_triggers_rebuild() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        feed.get().unwrap();
        let meta = feed
            .store()
            .document_path("/srv/show")
            .with_extension("meta.json");
        std::fs::write(&meta, b"{ not json").unwrap();

        let response = feed.get().unwrap();

        assert_eq!(response.status, CacheStatus::Missing);
        assert_eq!(feed.source().builds(), 2);
    }

    #[test]
    fn sidecar_without_its_document_is_not_served() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        let first = feed.get().unwrap();
        *feed.source().fingerprint.lock().unwrap() = "v2".to_string();

        // Sidecar of a v2 build landed, its document did not
        let meta = CacheMeta {
            key: "/srv/show".to_string(),
            fingerprint: "v2".to_string(),
            episode_count: 2,
            document_sha256: document_digest(b"<rss build=\"v2\"/>"),
        };
        std::fs::write(
            feed.store().meta_path("/srv/show"),
            serde_json::to_vec(&meta).unwrap(),
        )
        .unwrap();

        clock.advance(Duration::from_secs(1));
        let response = feed.get().unwrap();

        assert_eq!(response.status, CacheStatus::Missing);
        assert_ne!(response.bytes, first.bytes);
        assert_eq!(feed.source().builds(), 2);
    }

    #[test]
    fn document_without_its_sidecar_is_not_served() {
        let dir = tempdir().unwrap();
        let clock = ManualClock::new(start());
        let feed = cached(dir.path(), CountingSource::new("/srv/show"), &clock);

        feed.get().unwrap();
        std::fs::write(feed.store().document_path("/srv/show"), b"<rss build=\"v2\"/>").unwrap();

        let response = feed.get().unwrap();

        assert_eq!(response.status, CacheStatus::Missing);
        assert_eq!(feed.source().builds(), 2);
    }

    #[test]
    fn temp_file_in_the_way_is_left_alone() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("feed.xml");
        let temp = dir.path().join("feed.tmp");
        std::fs::write(&temp, b"someone else's").unwrap();

        let result = write_via(&temp, &target, b"<rss/>", None);

        assert!(matches!(result, Err(CacheError::WriteFailed { .. })));
        assert_eq!(std::fs::read(&temp).unwrap(), b"someone else's");
        assert!(!target.exists());
    }

    #[test]
    fn atomic_write_replaces_target_and_cleans_up() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("feed.xml");
        std::fs::write(&target, b"old").unwrap();

        write_atomically(&target, b"new", None).unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"new");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn record_stem_is_readable_and_unique() {
        let a = record_stem("/srv/podcasts/my show");
        let b = record_stem("/mnt/podcasts/my show");

        assert!(a.starts_with("my show-"));
        assert_ne!(a, b);
        assert!(record_stem("/").starts_with("feed-"));
    }

    #[test]
    fn completion_maps_to_exit_codes() {
        let response = CachedResponse {
            bytes: Bytes::new(),
            episode_count: 0,
            status: CacheStatus::Missing,
            generated_at: start(),
            write_error: None,
        };

        assert_eq!(response.completion(), Completion::EmptyWarning);
        assert_eq!(response.completion().exit_code(), EXIT_EMPTY_WARNING);
        assert_eq!(Completion::Success.exit_code(), 0);
    }
}
