use rss::Item;

use crate::episode::Episode;
use crate::error::ExtensionError;

use super::extension::{FeedExtension, Namespaces, element, element_with_attrs, push_element};

const MEDIA_NAMESPACE: &str = "http://search.yahoo.com/mrss/";

/// Media RSS elements describing each enclosure
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaRss;

impl FeedExtension for MediaRss {
    fn name(&self) -> &str {
        "media"
    }

    fn add_namespace_to(&self, namespaces: &mut Namespaces) -> Result<(), ExtensionError> {
        namespaces.insert("media".to_string(), MEDIA_NAMESPACE.to_string());
        Ok(())
    }

    fn append_to_item(&self, item: &mut Item, episode: &Episode) -> Result<(), ExtensionError> {
        let mut attrs = vec![
            ("url", episode.enclosure.url.to_string()),
            ("fileSize", episode.enclosure.length.to_string()),
            ("type", episode.enclosure.mime_type.clone()),
        ];
        if let Some(seconds) = episode.duration.as_deref().and_then(duration_seconds) {
            attrs.push(("duration", seconds.to_string()));
        }

        push_element(&mut item.extensions, element_with_attrs("media:content", attrs));
        push_element(&mut item.extensions, element("media:title", episode.title.clone()));
        Ok(())
    }
}

/// Convert `HH:MM:SS`, `MM:SS` or plain seconds into a number of seconds
pub fn duration_seconds(duration: &str) -> Option<u64> {
    let parts: Vec<&str> = duration.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    parts.iter().try_fold(0u64, |total, part| {
        let value: u64 = part.parse().ok()?;
        total.checked_mul(60)?.checked_add(value)
    })
}
