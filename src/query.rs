//! Search query building
//!
//! Turns guessed filename metadata into the text query sent to the subtitle
//! search API. Token order matters for result relevance and is fixed: year,
//! title, SxxEyy marker, release group, resolution, source.

use crate::metadata::{GuessedMetadata, release_group_from_suffix};

/// Builds the text search query for a video
///
/// Falls back to the raw filename when no title could be guessed, and to the
/// trailing `-<group>` filename suffix when the metadata carries no release
/// group. The joined query is cleaned as a whole: dots and underscores become
/// spaces and runs of whitespace collapse.
pub(crate) fn build_text_query(metadata: &GuessedMetadata, fallback_name: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(year) = metadata.year {
        parts.push(year.to_string());
    }

    let title = metadata
        .title
        .clone()
        .unwrap_or_else(|| fallback_name.to_string());
    parts.push(title);

    if let (Some(season), Some(episode)) = (metadata.season, metadata.episode) {
        parts.push(format!("S{:02}E{:02}", season, episode));
    }

    let release_group = metadata
        .release_group
        .clone()
        .or_else(|| release_group_from_suffix(fallback_name));
    if let Some(group) = release_group {
        parts.push(group);
    }

    if let Some(resolution) = &metadata.resolution {
        parts.push(resolution.clone());
    }

    if let Some(source) = &metadata.source {
        parts.push(source.clone());
    }

    clean_query(&parts.join(" "))
}

/// Replaces dot/underscore separators with spaces, collapses whitespace and
/// trims
fn clean_query(query: &str) -> String {
    query
        .replace(['.', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
