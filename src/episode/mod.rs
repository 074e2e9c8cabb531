mod media;
mod model;
mod tags;

pub use media::{DEFAULT_MEDIA_EXTENSIONS, media_extension, mime_for_extension, title_from_stem};
pub use model::{Enclosure, Episode};
pub use tags::{NoTags, SharedTagReader, TagReader, TrackTags};
