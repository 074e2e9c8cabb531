// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::sync::Arc;

use rss::extension::{Extension, ExtensionMap};
use rss::{Channel, Item};

use crate::episode::Episode;
use crate::error::ExtensionError;

/// Namespace declarations on the document root, keyed by prefix
pub type Namespaces = BTreeMap<String, String>;

/// A producer of extra metadata for the generated feed.
///
/// The feed calls every hook exactly once per generation: the namespace and
/// channel hooks once overall, the item hook once for each episode. Hooks only
/// ever add to what they are given; they never remove or rewrite what other
/// extensions contributed.
pub trait FeedExtension: Send + Sync {
    /// Name used in error messages
    fn name(&self) -> &str;

    /// Declare the XML namespace this extension writes into
    fn add_namespace_to(&self, namespaces: &mut Namespaces) -> Result<(), ExtensionError>;

    /// Add channel-level elements
    fn append_to_channel(&self, _channel: &mut Channel) -> Result<(), ExtensionError> {
        Ok(())
    }

    /// Add elements to the item rendered for `episode`
    fn append_to_item(&self, _item: &mut Item, _episode: &Episode) -> Result<(), ExtensionError> {
        Ok(())
    }
}

/// A shared reference to a feed extension
pub type SharedExtension = Arc<dyn FeedExtension>;

/// A namespaced element with a text value, e.g. `element("itunes:author", "Jane")`
pub fn element(name: &str, value: impl Into<String>) -> Extension {
    Extension {
        name: name.to_string(),
        value: Some(value.into()),
        ..Default::default()
    }
}

/// A namespaced element carrying only attributes
pub fn element_with_attrs<'a>(
    name: &str,
    attrs: impl IntoIterator<Item = (&'a str, String)>,
) -> Extension {
    Extension {
        name: name.to_string(),
        attrs: attrs
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
        ..Default::default()
    }
}

/// Append `element` to an extension map under its namespace prefix
pub fn push_element(map: &mut ExtensionMap, element: Extension) {
    let prefix = element
        .name
        .split_once(':')
        .map(|(prefix, _)| prefix.to_string())
        .unwrap_or_default();

    map.entry(prefix)
        .or_default()
        .entry(element.name.clone())
        .or_default()
        .push(element);
}
