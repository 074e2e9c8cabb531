// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use rss::{Channel, Item};

use crate::config::FeedConfig;
use crate::episode::Episode;
use crate::error::ExtensionError;

use super::extension::{FeedExtension, Namespaces, element, element_with_attrs, push_element};

const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";

/// Apple Podcasts metadata for the channel and every item
#[derive(Debug, Clone, Default)]
pub struct Itunes {
    pub subtitle: String,
    pub summary: String,
    pub author: String,
    pub owner_name: String,
    pub owner_email: String,
    /// Absolute image URL
    pub image: Option<String>,
    pub categories: Vec<String>,
    pub explicit: Option<String>,
    /// Appended to each item subtitle
    pub subtitle_suffix: String,
}

impl Itunes {
    pub fn from_config(config: &FeedConfig) -> Self {
        let itunes = &config.itunes;
        Self {
            subtitle: config.itunes_subtitle().to_string(),
            summary: config.itunes_summary().to_string(),
            author: itunes.author.clone(),
            owner_name: itunes.owner_name.clone(),
            owner_email: itunes.owner_email.clone(),
            image: itunes
                .image
                .as_deref()
                .and_then(|image| config.resolve_asset(image)),
            categories: itunes.categories.clone(),
            explicit: itunes.explicit.clone(),
            subtitle_suffix: itunes.subtitle_suffix.clone(),
        }
    }

    fn owner(&self) -> rss::extension::Extension {
        let mut children = BTreeMap::new();
        children.insert(
            "itunes:name".to_string(),
            vec![element("itunes:name", self.owner_name.clone())],
        );
        children.insert(
            "itunes:email".to_string(),
            vec![element("itunes:email", self.owner_email.clone())],
        );

        rss::extension::Extension {
            name: "itunes:owner".to_string(),
            children,
            ..Default::default()
        }
    }
}

impl FeedExtension for Itunes {
    fn name(&self) -> &str {
        "itunes"
    }

    fn add_namespace_to(&self, namespaces: &mut Namespaces) -> Result<(), ExtensionError> {
        namespaces.insert("itunes".to_string(), ITUNES_NAMESPACE.to_string());
        Ok(())
    }

    fn append_to_channel(&self, channel: &mut Channel) -> Result<(), ExtensionError> {
        let map = &mut channel.extensions;

        push_element(map, element("itunes:subtitle", self.subtitle.clone()));
        push_element(map, element("itunes:summary", self.summary.clone()));
        push_element(map, element("itunes:author", self.author.clone()));

        if !self.owner_name.is_empty() || !self.owner_email.is_empty() {
            push_element(map, self.owner());
        }
        if let Some(image) = &self.image {
            push_element(map, element_with_attrs("itunes:image", [("href", image.clone())]));
        }
        for category in &self.categories {
            push_element(
                map,
                element_with_attrs("itunes:category", [("text", category.clone())]),
            );
        }
        if let Some(explicit) = &self.explicit {
            push_element(map, element("itunes:explicit", explicit.clone()));
        }

        Ok(())
    }

    fn append_to_item(&self, item: &mut Item, episode: &Episode) -> Result<(), ExtensionError> {
        let map = &mut item.extensions;

        push_element(map, element("itunes:author", self.author.clone()));
        push_element(
            map,
            element(
                "itunes:subtitle",
                format!("{}{}", episode.description, self.subtitle_suffix),
            ),
        );
        push_element(map, element("itunes:summary", episode.description.clone()));
        if let Some(duration) = &episode.duration {
            push_element(map, element("itunes:duration", duration.clone()));
        }

        Ok(())
    }
}
