use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning a media directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Media directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read metadata of {path}: {source}")]
    MetadataFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Media URL '{url}' cannot be used as a base for file URLs")]
    InvalidMediaUrl { url: String },

    #[error("No episodes found in {0}")]
    EmptyResult(PathBuf),
}

/// Errors raised by a feed extension hook
#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("Extension '{extension}' failed: {reason}")]
    HookFailed { extension: String, reason: String },
}

/// Errors that can occur while generating the feed document
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Extension error: {0}")]
    Extension(#[from] ExtensionError),

    #[error("Failed to serialize RSS document: {0}")]
    Serialize(#[from] rss::Error),
}

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unknown description source '{0}', expected 'comment' or 'title'")]
    UnknownDescriptionSource(String),

    #[error("Cannot derive a file URL for directory {0}")]
    InvalidDirectory(PathBuf),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to convert configuration to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Errors that can occur when reading or writing the feed cache
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read cache file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse cache metadata {path}: {source}")]
    MetaParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize cache metadata: {0}")]
    MetaSerializeFailed(#[from] serde_json::Error),
}

/// Top-level errors for building a feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Generate error: {0}")]
    Generate(#[from] GenerateError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl FeedError {
    /// Whether this error is the empty-directory condition
    pub fn is_empty_result(&self) -> bool {
        matches!(self, FeedError::Scan(ScanError::EmptyResult(_)))
    }
}
