// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use url::Url;

/// A single feed entry derived from one media file
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub title: String,
    pub description: String,
    pub enclosure: Enclosure,
    /// Modification time of the media file
    pub pub_date: DateTime<Utc>,
    /// Stable identifier derived from the file's path below the scan root
    pub guid: String,
    pub duration: Option<String>,
    /// Path relative to the scan root, using `/` separators
    pub relative_path: String,
}

/// The media file attached to an episode
#[derive(Debug, Clone, PartialEq)]
pub struct Enclosure {
    pub url: Url,
    pub length: u64,
    pub mime_type: String,
}

impl Episode {
    /// Compute the guid for a file at `relative_path` below the scan root
    ///
    /// The guid depends only on the relative path, so it survives rescans,
    /// reordering and changes of the public media URL.
    pub fn guid_for(relative_path: &str) -> String {
        let digest = Sha256::digest(relative_path.as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}
