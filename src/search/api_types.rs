/// OpenSubtitles API response types for deserialization.
///
/// These structures mirror the JSON response format of the search and
/// download endpoints, limited to the fields this tool consults.
use serde::Deserialize;

/// Top-level response of the search endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    /// The list of search results (missing or null is treated as empty)
    #[serde(default)]
    pub data: Vec<SearchResult>,
}

/// A single search result wrapper.
#[derive(Debug, Deserialize)]
pub(super) struct SearchResult {
    /// The attributes payload carrying the fields of interest
    #[serde(default)]
    pub attributes: SearchAttributes,
}

/// The attributes of a search result.
#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchAttributes {
    /// Release slug (may be absent)
    #[serde(default)]
    pub slug: String,
    /// Downloadable subtitle files for this result
    #[serde(default)]
    pub files: Vec<SubtitleFileEntry>,
}

/// One downloadable file entry within a search result.
#[derive(Debug, Deserialize)]
pub(super) struct SubtitleFileEntry {
    /// Identifier for the download-resolution call
    pub file_id: u64,
}

/// Response of the download-resolution endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct DownloadResponse {
    /// The single-use download URL (absent on quota or service errors)
    pub link: Option<String>,
}
