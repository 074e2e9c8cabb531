use std::path::Path;

/// File extensions treated as episodes when no other list is configured
pub const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &[
    "mp3", "m4a", "m4b", "mp4", "aac", "ogg", "oga", "opus", "flac", "wav",
];

/// Lowercased extension of `path`, if it has one
pub fn media_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Map file extensions to enclosure MIME types
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "mp3" => Some("audio/mpeg"),
        "m4a" | "m4b" => Some("audio/x-m4a"),
        "mp4" => Some("video/mp4"),
        "aac" => Some("audio/aac"),
        "ogg" | "oga" => Some("audio/ogg"),
        "opus" => Some("audio/opus"),
        "flac" => Some("audio/flac"),
        "wav" => Some("audio/wav"),
        _ => None,
    }
}

/// Derive a human-readable title from a file stem
///
/// Underscores become spaces and runs of whitespace collapse into one.
/// An empty result falls back to the raw stem.
pub fn title_from_stem(stem: &str) -> String {
    let spaced: String = stem
        .chars()
        .map(|c| if c == '_' { ' ' } else { c })
        .collect();

    let collapsed = collapse_whitespace(&spaced);

    if collapsed.is_empty() {
        stem.to_string()
    } else {
        collapsed
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_space = true;

    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    result.trim_end().to_string()
}
