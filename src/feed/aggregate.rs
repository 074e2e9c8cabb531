// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use rss::{Channel, Enclosure, Guid, Image, Item};

use crate::config::{FeedConfig, GENERATOR};
use crate::episode::Episode;
use crate::error::GenerateError;

use super::extension::{Namespaces, SharedExtension};

/// A serialized feed document
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFeed {
    pub bytes: Bytes,
    /// Number of items in the document
    pub episode_count: usize,
}

/// In-memory owner of episodes and extensions that renders the RSS document
///
/// Episodes and extensions can be added in any order; every extension sees
/// every episode held at the time [`Feed::generate`] runs.
pub struct Feed {
    config: FeedConfig,
    episodes: Vec<Episode>,
    extensions: Vec<SharedExtension>,
}

impl Feed {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            episodes: Vec::new(),
            extensions: Vec::new(),
        }
    }

    pub fn add_episode(&mut self, episode: Episode) {
        self.episodes.push(episode);
    }

    pub fn add_episodes(&mut self, episodes: impl IntoIterator<Item = Episode>) {
        self.episodes.extend(episodes);
    }

    pub fn add_extension(&mut self, extension: SharedExtension) {
        self.extensions.push(extension);
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Render the document as of `now`
    ///
    /// Any extension failure aborts the whole generation; no partial
    /// document is ever returned.
    pub fn generate(&self, now: DateTime<Utc>) -> Result<GeneratedFeed, GenerateError> {
        let mut namespaces = Namespaces::new();
        for extension in &self.extensions {
            extension.add_namespace_to(&mut namespaces)?;
        }

        let mut channel = self.base_channel(now);
        channel.namespaces = namespaces;

        for extension in &self.extensions {
            extension.append_to_channel(&mut channel)?;
        }

        let mut items = Vec::with_capacity(self.episodes.len());
        for episode in &self.episodes {
            let mut item = base_item(episode);
            for extension in &self.extensions {
                extension.append_to_item(&mut item, episode)?;
            }
            items.push(item);
        }
        channel.items = items;

        let xml = channel.pretty_write_to(Vec::new(), b' ', 2)?;

        Ok(GeneratedFeed {
            bytes: Bytes::from(xml),
            episode_count: self.episodes.len(),
        })
    }

    fn base_channel(&self, now: DateTime<Utc>) -> Channel {
        let config = &self.config;

        let image = config
            .image
            .as_deref()
            .and_then(|image| config.resolve_asset(image))
            .map(|url| Image {
                url,
                title: config.title.clone(),
                link: config.link.clone(),
                ..Default::default()
            });

        let newest = self.episodes.iter().map(|e| e.pub_date).max();

        Channel {
            title: config.title.clone(),
            link: config.link.clone(),
            description: config.description.clone(),
            language: Some(config.language.clone()),
            copyright: Some(config.copyright.clone()),
            webmaster: config.webmaster(),
            pub_date: newest.map(|date| date.to_rfc2822()),
            last_build_date: Some(now.to_rfc2822()),
            generator: Some(GENERATOR.to_string()),
            ttl: Some(config.ttl.to_string()),
            image,
            ..Default::default()
        }
    }
}

fn base_item(episode: &Episode) -> Item {
    Item {
        title: Some(episode.title.clone()),
        description: Some(episode.description.clone()),
        enclosure: Some(Enclosure {
            url: episode.enclosure.url.to_string(),
            length: episode.enclosure.length.to_string(),
            mime_type: episode.enclosure.mime_type.clone(),
        }),
        guid: Some(Guid {
            value: episode.guid.clone(),
            permalink: false,
        }),
        pub_date: Some(episode.pub_date.to_rfc2822()),
        ..Default::default()
    }
}
