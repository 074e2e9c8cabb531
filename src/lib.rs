pub mod cache;
pub mod config;
pub mod episode;
pub mod error;
pub mod feed;
pub mod progress;
pub mod scan;

// Re-export main types for convenience
pub use cache::{
    CacheEntry, CacheStatus, CacheStore, CachedFeed, CachedResponse, Clock, Completion,
    EXIT_EMPTY_WARNING, FeedSource, SharedClock, SystemClock,
};
pub use config::{
    CacheOptions, DescriptionSource, FeedConfig, GENERATOR, ItunesConfig, ScanOptions, fingerprint,
};
pub use episode::{Enclosure, Episode, NoTags, SharedTagReader, TagReader, TrackTags};
pub use error::{CacheError, ConfigError, ExtensionError, FeedError, GenerateError, ScanError};
pub use feed::{
    AtomSelfLink, DirectoryPodcast, Feed, FeedExtension, GeneratedFeed, Itunes, MediaRss,
    Namespaces, SharedExtension,
};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use scan::{ScanOutcome, scan_directory};
