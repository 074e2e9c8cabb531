use std::path::Path;
use std::sync::Arc;

/// Metadata read from a media file's embedded tags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackTags {
    pub title: Option<String>,
    /// The comment tag
    pub description: Option<String>,
    pub album: Option<String>,
    /// Duration in `HH:MM:SS` or `MM:SS` form
    pub duration: Option<String>,
}

/// Source of per-file metadata.
///
/// Tag parsing lives outside this crate; implementations adapt whatever
/// tag library the host application uses.
pub trait TagReader: Send + Sync {
    /// Read tags for the file at `path`, or `None` if nothing is known
    fn read_tags(&self, path: &Path) -> Option<TrackTags>;
}

/// A shared reference to a tag reader
pub type SharedTagReader = Arc<dyn TagReader>;

/// A tag reader that never knows anything. Episodes fall back to
/// file-name titles and sidecar descriptions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTags;

impl TagReader for NoTags {
    fn read_tags(&self, _path: &Path) -> Option<TrackTags> {
        None
    }
}

impl NoTags {
    /// Create a new NoTags wrapped in an Arc
    pub fn shared() -> SharedTagReader {
        Arc::new(Self)
    }
}
