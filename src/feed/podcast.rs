// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use url::Url;

use crate::cache::FeedSource;
use crate::config::{FeedConfig, ScanOptions, fingerprint};
use crate::episode::{NoTags, SharedTagReader};
use crate::error::{ConfigError, FeedError};
use crate::progress::{NoopReporter, ProgressEvent, SharedProgressReporter};
use crate::scan::scan_directory;

use super::aggregate::{Feed, GeneratedFeed};
use super::atom::AtomSelfLink;
use super::extension::SharedExtension;
use super::itunes::Itunes;
use super::media_rss::MediaRss;

/// The scan-and-generate pipeline for one media directory
///
/// Registers the Atom self-link, iTunes and Media RSS extensions by default.
pub struct DirectoryPodcast {
    root: PathBuf,
    config: FeedConfig,
    scan: ScanOptions,
    media_url: Url,
    tags: SharedTagReader,
    extensions: Vec<SharedExtension>,
    reporter: SharedProgressReporter,
    /// Fingerprint of the configuration alone; extensions are folded in on demand
    config_fingerprint: String,
}

impl DirectoryPodcast {
    pub fn new(root: &Path, config: FeedConfig, scan: ScanOptions) -> Result<Self, ConfigError> {
        let media_url = config.media_base_url()?;
        let config_fingerprint = fingerprint(&config, &scan)?;
        let extensions: Vec<SharedExtension> = vec![
            Arc::new(AtomSelfLink::from_config(&config)),
            Arc::new(Itunes::from_config(&config)),
            Arc::new(MediaRss),
        ];

        Ok(Self {
            root: root.to_path_buf(),
            config,
            scan,
            media_url,
            tags: NoTags::shared(),
            extensions,
            reporter: NoopReporter::shared(),
            config_fingerprint,
        })
    }

    /// Use `tags` to read per-file titles, descriptions and durations
    pub fn with_tag_reader(mut self, tags: SharedTagReader) -> Self {
        self.tags = tags;
        self
    }

    /// Register an additional extension after the built-in ones
    pub fn with_extension(mut self, extension: SharedExtension) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn with_reporter(mut self, reporter: SharedProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Scan the directory and render the feed as of `now`
    pub fn generate(&self, now: DateTime<Utc>) -> Result<GeneratedFeed, FeedError> {
        self.reporter.report(ProgressEvent::ScanStarted {
            root: self.root.clone(),
        });

        let outcome = scan_directory(&self.root, &self.scan, &self.media_url, self.tags.as_ref(), now)?;

        self.reporter.report(ProgressEvent::ScanCompleted {
            root: self.root.clone(),
            episodes: outcome.episodes.len(),
            skipped_too_young: outcome.skipped_too_young,
        });

        if outcome.episodes.is_empty() {
            self.reporter.report(ProgressEvent::EmptyFeed {
                root: self.root.clone(),
            });
        }

        let mut feed = Feed::new(self.config.clone());
        for extension in &self.extensions {
            feed.add_extension(extension.clone());
        }
        feed.add_episodes(outcome.episodes);

        Ok(feed.generate(now)?)
    }
}

impl FeedSource for DirectoryPodcast {
    fn cache_key(&self) -> String {
        self.root
            .canonicalize()
            .unwrap_or_else(|_| self.root.clone())
            .display()
            .to_string()
    }

    /// Configuration fingerprint combined with the names of all registered
    /// extensions, in registration order
    fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.config_fingerprint.as_bytes());
        for extension in &self.extensions {
            hasher.update([0]);
            hasher.update(extension.name().as_bytes());
        }

        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    fn build(&self, now: DateTime<Utc>) -> Result<GeneratedFeed, FeedError> {
        self.generate(now)
    }
}
