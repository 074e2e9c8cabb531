mod aggregate;
mod atom;
mod extension;
mod itunes;
mod media_rss;
mod podcast;

pub use aggregate::{Feed, GeneratedFeed};
pub use atom::AtomSelfLink;
pub use extension::{FeedExtension, Namespaces, SharedExtension, element, element_with_attrs, push_element};
pub use itunes::Itunes;
pub use media_rss::{MediaRss, duration_seconds};
pub use podcast::DirectoryPodcast;
