// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use url::Url;

use crate::config::{DescriptionSource, ScanOptions};
use crate::episode::{Enclosure, Episode, TagReader, media_extension, mime_for_extension, title_from_stem};
use crate::error::ScanError;

/// Result of scanning a media directory
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Episodes ordered newest first, truncated to the configured maximum
    pub episodes: Vec<Episode>,
    /// Media files skipped because they were modified too recently
    pub skipped_too_young: usize,
}

/// A media file that passed the extension and age filters
#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    relative_path: String,
    modified: DateTime<Utc>,
    length: u64,
}

/// Scan `root` for media files and turn them into episodes
///
/// Files younger than `min_file_age` are dropped before the `max_items`
/// limit is applied. The remaining files are ordered by modification time,
/// newest first, with ties broken by relative path.
pub fn scan_directory(
    root: &Path,
    options: &ScanOptions,
    media_url: &Url,
    tags: &dyn TagReader,
    now: DateTime<Utc>,
) -> Result<ScanOutcome, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    collect_files(root, options.recursive, &mut files)?;

    let mut candidates = Vec::new();
    let mut skipped_too_young = 0;

    for path in files {
        let is_media = media_extension(&path)
            .is_some_and(|ext| options.media_extensions.iter().any(|allowed| *allowed == ext));
        if !is_media {
            continue;
        }

        let metadata = std::fs::metadata(&path).map_err(|e| ScanError::MetadataFailed {
            path: path.clone(),
            source: e,
        })?;
        let modified: DateTime<Utc> = metadata
            .modified()
            .unwrap_or(SystemTime::UNIX_EPOCH)
            .into();

        let age = now
            .signed_duration_since(modified)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if age < options.min_file_age {
            skipped_too_young += 1;
            continue;
        }

        candidates.push(Candidate {
            relative_path: relative_path(root, &path),
            path,
            modified,
            length: metadata.len(),
        });
    }

    candidates.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.relative_path.cmp(&b.relative_path))
    });
    candidates.truncate(options.max_items);

    if candidates.is_empty() && options.empty_is_error {
        return Err(ScanError::EmptyResult(root.to_path_buf()));
    }

    let episodes = candidates
        .into_iter()
        .map(|candidate| build_episode(candidate, options, media_url, tags))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        root = %root.display(),
        episodes = episodes.len(),
        skipped_too_young,
        "Scanned media directory"
    );

    Ok(ScanOutcome {
        episodes,
        skipped_too_young,
    })
}

/// Collect regular files below `dir`, skipping hidden entries
fn collect_files(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> Result<(), ScanError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ScanError::ReadDirectoryFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ScanError::ReadDirectoryFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        let is_hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if is_hidden {
            continue;
        }

        if path.is_dir() {
            if recursive {
                collect_files(&path, recursive, files)?;
            }
        } else if path.is_file() {
            files.push(path);
        }
    }

    Ok(())
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn build_episode(
    candidate: Candidate,
    options: &ScanOptions,
    media_url: &Url,
    tags: &dyn TagReader,
) -> Result<Episode, ScanError> {
    let mut url = media_url.clone();
    url.path_segments_mut()
        .map_err(|_| ScanError::InvalidMediaUrl {
            url: media_url.to_string(),
        })?
        .pop_if_empty()
        .extend(candidate.relative_path.split('/'));

    let stem = candidate
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let tags = tags.read_tags(&candidate.path).unwrap_or_default();

    let title = tags.title.unwrap_or_else(|| title_from_stem(&stem));
    let title = match tags.album.filter(|album| options.long_titles && !album.is_empty()) {
        Some(album) => format!("{album} - {title}"),
        None => title,
    };

    let tag_description = match options.description_source {
        DescriptionSource::Comment => tags.description,
        DescriptionSource::Title => None,
    };
    let description = read_episode_description(&candidate.path)
        .or(tag_description)
        .unwrap_or_else(|| title.clone());

    let mime_type = media_extension(&candidate.path)
        .and_then(|ext| mime_for_extension(&ext))
        .unwrap_or("application/octet-stream")
        .to_string();

    Ok(Episode {
        title,
        description,
        enclosure: Enclosure {
            url,
            length: candidate.length,
            mime_type,
        },
        pub_date: candidate.modified,
        guid: Episode::guid_for(&candidate.relative_path),
        duration: tags.duration,
        relative_path: candidate.relative_path,
    })
}

/// Read a `<stem>.txt` file next to the media file, if there is one
fn read_episode_description(media_path: &Path) -> Option<String> {
    let sidecar = media_path.with_extension("txt");
    std::fs::read_to_string(sidecar)
        .ok()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
