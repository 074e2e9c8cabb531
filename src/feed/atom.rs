// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use rss::Channel;

use crate::config::FeedConfig;
use crate::error::ExtensionError;

use super::extension::{FeedExtension, Namespaces, element_with_attrs, push_element};

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Adds an `<atom:link rel="self">` pointing at the feed's own URL
#[derive(Debug, Clone)]
pub struct AtomSelfLink {
    href: String,
    media_type: String,
}

impl AtomSelfLink {
    pub fn new(href: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media_type: media_type.into(),
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(&config.rss_link, &config.atom_type)
    }
}

impl FeedExtension for AtomSelfLink {
    fn name(&self) -> &str {
        "atom"
    }

    fn add_namespace_to(&self, namespaces: &mut Namespaces) -> Result<(), ExtensionError> {
        namespaces.insert("atom".to_string(), ATOM_NAMESPACE.to_string());
        Ok(())
    }

    fn append_to_channel(&self, channel: &mut Channel) -> Result<(), ExtensionError> {
        push_element(
            &mut channel.extensions,
            element_with_attrs(
                "atom:link",
                [
                    ("href", self.href.clone()),
                    ("rel", "self".to_string()),
                    ("type", self.media_type.clone()),
                ],
            ),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_atom_namespace() {
        let mut namespaces = Namespaces::new();
        AtomSelfLink::new("http://www.example.com/rss", "application/rss+xml")
            .add_namespace_to(&mut namespaces)
            .unwrap();

        assert_eq!(namespaces.get("atom").map(String::as_str), Some(ATOM_NAMESPACE));
    }

    #[test]
    fn appends_self_link() {
        let mut channel = Channel::default();
        AtomSelfLink::new("http://www.example.com/rss", "application/rss+xml")
            .append_to_channel(&mut channel)
            .unwrap();

        let link = &channel.extensions["atom"]["atom:link"][0];
        assert_eq!(link.attrs["href"], "http://www.example.com/rss");
        assert_eq!(link.attrs["rel"], "self");
        assert_eq!(link.attrs["type"], "application/rss+xml");
    }

    #[test]
    fn from_config_uses_rss_link_and_atom_type() {
        let config = FeedConfig {
            rss_link: "https://pod.example.com/feed.xml".to_string(),
            ..FeedConfig::default()
        };
        let atom = AtomSelfLink::from_config(&config);

        assert_eq!(atom.href, "https://pod.example.com/feed.xml");
        assert_eq!(atom.media_type, "application/rss+xml");
    }
}
