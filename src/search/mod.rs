//! Subtitle search types and provider boundary
//!
//! This module defines the search request/candidate data model and the
//! [`SubtitleProvider`] trait that abstracts the remote subtitle service. The
//! rest of the crate only ever sees typed candidates parsed once at this
//! boundary, never raw JSON.

mod api_types;
mod opensubtitles;

pub(crate) use opensubtitles::OpenSubtitlesProvider;

/// How many results to request for a hash-based search
const HASH_SEARCH_LIMIT: u32 = 10;

/// How many results to request for a text-based search
const TEXT_SEARCH_LIMIT: u32 = 20;

/// The lookup signal a search is keyed on
///
/// Hash queries are issued first: a content-hash match identifies the exact
/// encode and makes release-group filtering unnecessary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Content-hash lookup using the movie hash fingerprint
    MovieHash(String),
    /// Free-text lookup built from filename metadata
    Text(String),
}

/// One search request against the subtitle service
///
/// Result ordering is fixed to downloads, descending; only the lookup signal,
/// language and result limit vary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// The lookup signal
    pub kind: QueryKind,
    /// Subtitle language code, e.g. "en"
    pub language: String,
    /// Maximum number of results to request
    pub limit: u32,
}

impl SearchQuery {
    /// Creates a content-hash search query
    pub fn by_hash(hash: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::MovieHash(hash.into()),
            language: language.into(),
            limit: HASH_SEARCH_LIMIT,
        }
    }

    /// Creates a free-text search query
    pub fn by_text(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::Text(text.into()),
            language: language.into(),
            limit: TEXT_SEARCH_LIMIT,
        }
    }
}

/// Reference to one downloadable file inside a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtitleFileRef {
    /// Identifier passed to the download-resolution endpoint
    pub file_id: u64,
}

/// One subtitle search result
///
/// A candidate may contain several downloadable files; only the first is ever
/// resolved (list order, no ranking within a candidate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Human-readable release slug, used for release-group matching
    pub slug: String,
    /// Downloadable files belonging to this result
    pub files: Vec<SubtitleFileRef>,
}

impl Candidate {
    /// Whether this candidate has at least one downloadable file
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}

/// Trait for subtitle search services
///
/// Both operations degrade instead of failing: a network error, a non-200
/// response or a malformed body yields an empty candidate list (or `None` for
/// resolution) so the selector's fallback logic can proceed uninterrupted.
pub(crate) trait SubtitleProvider {
    /// Executes a search request and returns the candidates in service order
    fn search(&self, query: &SearchQuery) -> Vec<Candidate>;

    /// Resolves a candidate's first file into a single-use download URL
    fn resolve_link(&self, candidate: &Candidate) -> Option<String>;
}
