//! Feed, scan and cache settings.
//!
//! Channel settings are resolved per media directory in three layers:
//! built-in defaults, sidecar files found in the directory (`description.txt`,
//! `image.jpg`, ...), and finally an optional `dirfeed.toml`. Callers apply
//! command-line overrides on top of the returned value.
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

use crate::episode::DEFAULT_MEDIA_EXTENSIONS;
use crate::error::ConfigError;

/// Generator identity written into every feed and folded into cache fingerprints
pub const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Name of the optional per-directory config file
pub const CONFIG_FILENAME: &str = "dirfeed.toml";

// ============================================================================
// Channel configuration
// ============================================================================

/// Channel-level settings for the generated feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub title: String,
    pub link: String,
    /// Public URL of the feed itself, used for the Atom self-link
    pub rss_link: String,
    pub description: String,
    pub language: String,
    pub copyright: String,
    /// Minutes a subscriber may cache the feed
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webmaster: Option<String>,
    /// Channel image, absolute or relative to `media_url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub atom_type: String,
    /// Base URL under which the media files are published
    pub media_url: String,
    pub itunes: ItunesConfig,
}

/// Settings for the iTunes podcast namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItunesConfig {
    /// Falls back to the channel description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Falls back to the channel description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub author: String,
    pub owner_name: String,
    pub owner_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit: Option<String>,
    /// Appended to every item's `itunes:subtitle`
    pub subtitle_suffix: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            link: "http://www.example.com/".to_string(),
            rss_link: "http://www.example.com/rss".to_string(),
            description: "Podcast".to_string(),
            language: "en-us".to_string(),
            copyright: Utc::now().year().to_string(),
            ttl: 60,
            webmaster: None,
            image: None,
            atom_type: "application/rss+xml".to_string(),
            media_url: String::new(),
            itunes: ItunesConfig::default(),
        }
    }
}

impl FeedConfig {
    /// Resolve the configuration for a media directory
    ///
    /// `config_file` overrides the location of the TOML file; by default
    /// `dirfeed.toml` inside `dir` is used when it exists.
    pub fn for_directory(dir: &Path, config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self {
            title: directory_title(dir),
            media_url: directory_url(dir)?.to_string(),
            ..Self::default()
        };

        config.apply_sidecars(dir);

        let config_path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dir.join(CONFIG_FILENAME));

        if config_file.is_some() || config_path.is_file() {
            config = config.merge_toml_file(&config_path)?;
        }

        Ok(config)
    }

    /// The webmaster, defaulting to `email (name)` of the iTunes owner
    pub fn webmaster(&self) -> Option<String> {
        self.webmaster.clone().or_else(|| {
            let owner = &self.itunes;
            (!owner.owner_email.is_empty() && !owner.owner_name.is_empty())
                .then(|| format!("{} ({})", owner.owner_email, owner.owner_name))
        })
    }

    /// The iTunes subtitle, defaulting to the channel description
    pub fn itunes_subtitle(&self) -> &str {
        self.itunes.subtitle.as_deref().unwrap_or(&self.description)
    }

    /// The iTunes summary, defaulting to the channel description
    pub fn itunes_summary(&self) -> &str {
        self.itunes.summary.as_deref().unwrap_or(&self.description)
    }

    /// Parse `media_url` as a base URL that files can be joined onto
    pub fn media_base_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.media_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { url: raw, source })
    }

    /// Resolve a possibly relative asset reference against `media_url`
    pub fn resolve_asset(&self, reference: &str) -> Option<String> {
        match Url::parse(reference) {
            Ok(url) => Some(url.to_string()),
            Err(_) => self
                .media_base_url()
                .ok()
                .and_then(|base| base.join(reference).ok())
                .map(|url| url.to_string()),
        }
    }

    fn apply_sidecars(&mut self, dir: &Path) {
        if let Some(text) = read_sidecar_text(&dir.join("description.txt")) {
            self.description = text;
        }
        if let Some(text) = read_sidecar_text(&dir.join("itunes_subtitle.txt")) {
            self.itunes.subtitle = Some(text);
        }
        if let Some(text) = read_sidecar_text(&dir.join("itunes_summary.txt")) {
            self.itunes.summary = Some(text);
        }
        if let Some(image) = find_sidecar_image(dir, "image") {
            self.image = Some(image);
        }
        if let Some(image) = find_sidecar_image(dir, "itunes_image") {
            self.itunes.image = Some(image);
        }
    }

    /// Layer the keys of a TOML file over the current values
    fn merge_toml_file(self, path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let overlay: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut base = match toml::Value::try_from(&self)? {
            toml::Value::Table(table) => table,
            _ => toml::Table::new(),
        };
        merge_tables(&mut base, overlay);

        toml::Value::Table(base)
            .try_into()
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(nested) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, nested);
                continue;
            }
            base.insert(key, toml::Value::Table(nested));
        } else {
            base.insert(key, value);
        }
    }
}

fn directory_title(dir: &Path) -> String {
    let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Podcast".to_string())
}

fn directory_url(dir: &Path) -> Result<Url, ConfigError> {
    let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    Url::from_directory_path(&canonical).map_err(|_| ConfigError::InvalidDirectory(canonical))
}

fn read_sidecar_text(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text.trim().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable sidecar file");
            None
        }
    }
}

fn find_sidecar_image(dir: &Path, stem: &str) -> Option<String> {
    ["jpg", "png"]
        .iter()
        .map(|ext| format!("{stem}.{ext}"))
        .find(|name| dir.join(name).is_file())
}

// ============================================================================
// Scan and cache options
// ============================================================================

/// Where an episode description comes from when there is no `<stem>.txt`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionSource {
    /// The comment tag, falling back to the title
    #[default]
    Comment,
    /// The episode title
    Title,
}

impl FromStr for DescriptionSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comment" => Ok(Self::Comment),
            "title" => Ok(Self::Title),
            _ => Err(ConfigError::UnknownDescriptionSource(s.to_string())),
        }
    }
}

/// How the media directory is turned into episodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Maximum number of episodes in the feed
    pub max_items: usize,
    /// Files modified more recently than this are still being written and are skipped
    pub min_file_age: Duration,
    /// Fail instead of producing an empty feed
    pub empty_is_error: bool,
    /// Lowercase file extensions that count as episodes
    pub media_extensions: Vec<String>,
    /// Prefix tag titles with the album: `Album - Title`
    pub long_titles: bool,
    pub description_source: DescriptionSource,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            max_items: 10,
            min_file_age: Duration::ZERO,
            empty_is_error: false,
            media_extensions: DEFAULT_MEDIA_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            long_titles: false,
            description_source: DescriptionSource::Comment,
        }
    }
}

/// Where and for how long generated feeds are cached
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    pub directory: PathBuf,
    /// Records younger than this are served without rescanning
    pub min_cache_time: Duration,
}

impl CacheOptions {
    /// Default cache location for a media directory
    pub fn for_directory(dir: &Path) -> Self {
        Self {
            directory: dir.join("temp"),
            min_cache_time: Duration::from_secs(5),
        }
    }
}

/// Fingerprint of everything besides the directory contents that shapes the output
///
/// A cached document whose fingerprint differs from the current one is stale.
pub fn fingerprint(config: &FeedConfig, scan: &ScanOptions) -> Result<String, ConfigError> {
    let mut hasher = Sha256::new();
    hasher.update(GENERATOR.as_bytes());
    hasher.update([0]);
    hasher.update(serde_json::to_vec(config)?);
    hasher.update([0]);
    hasher.update(serde_json::to_vec(scan)?);

    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}
