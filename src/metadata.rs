//! Filename metadata guessing
//!
//! This module parses release-style video filenames into structured metadata
//! (title, year, season/episode, resolution, source, release group). It is a
//! heuristic parser: a field that cannot be identified with reasonable
//! confidence is simply left empty and downstream code works with what is
//! available.

use regex_lite::Regex;
use std::sync::LazyLock;

static SEASON_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bS(\d{1,2})[ ._-]?E(\d{1,2})\b").unwrap()
});

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());

static RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{3,4}p|4k)\b").unwrap());

static SOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(blu-?ray|bd-?rip|br-?rip|web-?dl|web-?rip|web|hdtv|dvd-?rip|hd-?rip|cam)\b")
        .unwrap()
});

static RELEASE_GROUP_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\s*(\w+)$").unwrap());

/// Trailing tokens that look like a release-group suffix but are part of a
/// source or codec tag (e.g. the "DL" in "WEB-DL")
const NON_GROUP_SUFFIXES: &[&str] = &[
    "dl", "rip", "web", "hdtv", "bluray", "webdl", "webrip", "bdrip", "brrip", "dvdrip", "hdrip",
    "x264", "x265", "h264", "h265", "aac", "dts", "ac3",
];

/// Structured metadata guessed from a video filename
///
/// Produced once per video and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessedMetadata {
    /// Title portion of the name, with separators cleaned to spaces
    pub title: Option<String>,
    /// Release year, when a plausible four-digit year token is present
    pub year: Option<u32>,
    /// Season number from an SxxEyy marker
    pub season: Option<u32>,
    /// Episode number from an SxxEyy marker
    pub episode: Option<u32>,
    /// Video resolution token such as "1080p"
    pub resolution: Option<String>,
    /// Source tag such as "BluRay" or "WEB-DL"
    pub source: Option<String>,
    /// Release group, usually the trailing `-GROUP` suffix
    pub release_group: Option<String>,
}

/// Guesses structured metadata from a video filename (without extension)
pub(crate) fn guess_from_name(name: &str) -> GuessedMetadata {
    let mut metadata = GuessedMetadata::default();

    // The title is whatever comes before the first recognized marker.
    let mut title_end = name.len();

    if let Some(captures) = SEASON_EPISODE.captures(name) {
        metadata.season = captures.get(1).and_then(|m| m.as_str().parse().ok());
        metadata.episode = captures.get(2).and_then(|m| m.as_str().parse().ok());
        if let Some(m) = captures.get(0) {
            title_end = title_end.min(m.start());
        }
    }

    if let Some(m) = YEAR.find(name) {
        metadata.year = m.as_str().parse().ok();
        title_end = title_end.min(m.start());
    }

    if let Some(m) = RESOLUTION.find(name) {
        metadata.resolution = Some(m.as_str().to_string());
        title_end = title_end.min(m.start());
    }

    if let Some(m) = SOURCE.find(name) {
        metadata.source = Some(m.as_str().to_string());
        title_end = title_end.min(m.start());
    }

    metadata.release_group = release_group_from_suffix(name);

    let title = clean_separators(&name[..title_end]);
    if !title.is_empty() {
        metadata.title = Some(title);
    }

    metadata
}

/// Extracts a release group from a trailing `-<alnum>` suffix
///
/// Returns `None` when the suffix is a source/codec tag rather than a group
/// name, so "Show.S01E02.WEB-DL" does not yield a group of "DL".
pub(crate) fn release_group_from_suffix(name: &str) -> Option<String> {
    let group = RELEASE_GROUP_SUFFIX
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())?;

    if NON_GROUP_SUFFIXES.contains(&group.to_lowercase().as_str()) {
        return None;
    }
    Some(group)
}

/// Replaces dot/underscore separators with spaces and collapses whitespace
fn clean_separators(value: &str) -> String {
    value
        .replace(['.', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
