use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Events emitted while building or serving a feed
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Directory scan is starting
    ScanStarted { root: PathBuf },

    /// Directory scan finished
    ScanCompleted {
        root: PathBuf,
        /// Episodes that made it into the feed
        episodes: usize,
        /// Media files skipped because they were modified too recently
        skipped_too_young: usize,
    },

    /// The scan found nothing and empty feeds are allowed
    EmptyFeed { root: PathBuf },

    /// A cached document was fresh and served as-is
    CacheServed {
        key: String,
        /// Age of the record at the time it was served
        age: Duration,
    },

    /// The cached document was missing or stale and has been regenerated
    CacheRebuilt { key: String, episodes: usize },

    /// The regenerated document could not be persisted
    CacheWriteFailed { key: String, error: String },
}

/// Trait for reporting progress events.
///
/// Implementations can use this to display spinners, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
