//! Candidate selection module
//!
//! The decision core of the tool: given the candidates of a search and the
//! release group of the local video, pick the best candidate that actually
//! yields a working download link. Release-group agreement between video and
//! subtitle strongly predicts synchronization quality, so group-matching
//! candidates are tried first, with two fallback passes guaranteeing that
//! *some* result is returned whenever any candidate resolves.

use crate::search::{Candidate, SubtitleProvider};
use std::fmt;

/// How a selection was arrived at
///
/// Provenance metadata only: it is written to the activity log and reported
/// to the user but never drives control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMethod {
    /// Content-hash search matched the exact encode
    Hash,
    /// Text search, candidate slug matched the video's release group
    QueryGroupMatch,
    /// Text search, no release-group agreement
    GeneralQuery,
}

impl SelectionMethod {
    /// The provenance label written to the activity log
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMethod::Hash => "hash",
            SelectionMethod::QueryGroupMatch => "query + string match group",
            SelectionMethod::GeneralQuery => "general_query",
        }
    }
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chosen candidate with its resolved download link
#[derive(Debug, Clone)]
pub struct Selection {
    /// The winning candidate
    pub candidate: Candidate,
    /// How the candidate was chosen
    pub method: SelectionMethod,
    /// Single-use download URL, already verified to exist
    pub link: String,
}

/// Normalizes a slug or release group for substring comparison
///
/// Separator characters (`.`, `-`, `_`, space) are stripped and the rest is
/// lowercased, so "WEB-DL x264-Group.Name" and "groupname" compare equal.
pub(crate) fn normalize(value: &str) -> String {
    value.to_lowercase().replace(['.', '-', '_', ' '], "")
}

/// Selects the best candidate from text-search results
///
/// Three passes, first resolvable match wins:
/// 1. candidates whose normalized slug contains the normalized release group,
/// 2. the first candidate that had files at all,
/// 3. an exhaustive scan over every candidate with files.
///
/// Returns `None` only when no candidate across all passes yields a working
/// download link.
pub(crate) fn select_best(
    provider: &dyn SubtitleProvider,
    candidates: &[Candidate],
    target_release_group: Option<&str>,
) -> Option<Selection> {
    let target = target_release_group
        .map(normalize)
        .filter(|group| !group.is_empty());

    // Pass 1: direct release-group match, remembering the first candidate
    // with files as the pass-2 fallback.
    let mut first_fallback: Option<&Candidate> = None;

    for candidate in candidates {
        if candidate.has_files() && first_fallback.is_none() {
            first_fallback = Some(candidate);
        }

        let Some(target) = &target else { continue };
        if !candidate.has_files() || !normalize(&candidate.slug).contains(target.as_str()) {
            continue;
        }

        if let Some(link) = provider.resolve_link(candidate) {
            return Some(Selection {
                candidate: candidate.clone(),
                method: SelectionMethod::QueryGroupMatch,
                link,
            });
        }
        // Matched slug but no link; keep scanning other matches.
    }

    // Pass 2: first candidate that had files, regardless of slug.
    if let Some(candidate) = first_fallback {
        if let Some(link) = provider.resolve_link(candidate) {
            return Some(Selection {
                candidate: candidate.clone(),
                method: SelectionMethod::GeneralQuery,
                link,
            });
        }
    }

    // Pass 3: exhaustive scan for any candidate that resolves.
    for candidate in candidates {
        if !candidate.has_files() {
            continue;
        }
        if let Some(link) = provider.resolve_link(candidate) {
            let method = match &target {
                Some(target) if normalize(&candidate.slug).contains(target.as_str()) => {
                    SelectionMethod::QueryGroupMatch
                }
                _ => SelectionMethod::GeneralQuery,
            };
            return Some(Selection {
                candidate: candidate.clone(),
                method,
                link,
            });
        }
    }

    None
}

/// Selects the first resolvable candidate from hash-search results
///
/// A hash match already identifies the exact encode, so no release-group
/// filtering applies: scan in service order and return the first candidate
/// that yields a link.
pub(crate) fn select_by_hash(
    provider: &dyn SubtitleProvider,
    candidates: &[Candidate],
) -> Option<Selection> {
    for candidate in candidates {
        if !candidate.has_files() {
            continue;
        }
        if let Some(link) = provider.resolve_link(candidate) {
            return Some(Selection {
                candidate: candidate.clone(),
                method: SelectionMethod::Hash,
                link,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchQuery, SubtitleFileRef};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Provider stub whose resolution behavior is scripted per slug
    ///
    /// `failures_before_success` holds how many resolution attempts fail
    /// before a slug starts resolving; slugs not listed resolve immediately.
    /// Slugs listed with `usize::MAX` never resolve.
    struct ScriptedProvider {
        failures_before_success: RefCell<HashMap<String, usize>>,
        resolve_calls: RefCell<Vec<String>>,
    }

    impl ScriptedProvider {
        fn resolving_all() -> Self {
            Self::with_failures(&[])
        }

        fn with_failures(failures: &[(&str, usize)]) -> Self {
            Self {
                failures_before_success: RefCell::new(
                    failures
                        .iter()
                        .map(|(slug, count)| (slug.to_string(), *count))
                        .collect(),
                ),
                resolve_calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.resolve_calls.borrow().clone()
        }
    }

    impl SubtitleProvider for ScriptedProvider {
        fn search(&self, _query: &SearchQuery) -> Vec<Candidate> {
            Vec::new()
        }

        fn resolve_link(&self, candidate: &Candidate) -> Option<String> {
            self.resolve_calls.borrow_mut().push(candidate.slug.clone());

            let mut failures = self.failures_before_success.borrow_mut();
            match failures.get_mut(&candidate.slug) {
                Some(&mut usize::MAX) => None,
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    None
                }
                _ => Some(format!("https://dl.example.com/{}", candidate.slug)),
            }
        }
    }

    fn candidate(slug: &str, file_count: usize) -> Candidate {
        Candidate {
            slug: slug.to_string(),
            files: (0..file_count as u64)
                .map(|file_id| SubtitleFileRef { file_id })
                .collect(),
        }
    }

    #[test]
    fn test_group_match_wins_over_earlier_candidates() {
        let provider = ScriptedProvider::resolving_all();
        let candidates = vec![
            candidate("some-other-release", 1),
            candidate("show-s01e01-1080p-ntb", 1),
            candidate("third-release", 1),
        ];

        let selection = select_best(&provider, &candidates, Some("NTb")).unwrap();
        assert_eq!(selection.candidate.slug, "show-s01e01-1080p-ntb");
        assert_eq!(selection.method, SelectionMethod::QueryGroupMatch);
        assert_eq!(selection.method.as_str(), "query + string match group");
        // Only the matching candidate was resolved.
        assert_eq!(provider.calls(), vec!["show-s01e01-1080p-ntb"]);
    }

    #[test]
    fn test_fallback_to_first_candidate_with_files() {
        let provider = ScriptedProvider::resolving_all();
        let candidates = vec![
            candidate("first-release", 1),
            candidate("second-release", 1),
        ];

        let selection = select_best(&provider, &candidates, Some("NTb")).unwrap();
        assert_eq!(selection.candidate.slug, "first-release");
        assert_eq!(selection.method, SelectionMethod::GeneralQuery);
        assert_eq!(selection.method.as_str(), "general_query");
    }

    #[test]
    fn test_fileless_candidates_are_skipped() {
        let provider = ScriptedProvider::resolving_all();
        let candidates = vec![
            candidate("empty-but-matching-ntb", 0),
            candidate("has-files", 1),
        ];

        let selection = select_best(&provider, &candidates, Some("NTb")).unwrap();
        assert_eq!(selection.candidate.slug, "has-files");
        assert_eq!(selection.method, SelectionMethod::GeneralQuery);
    }

    #[test]
    fn test_exhaustive_scan_skips_failed_resolutions() {
        let provider = ScriptedProvider::with_failures(&[
            ("first", usize::MAX),
            ("second", usize::MAX),
        ]);
        let candidates = vec![
            candidate("first", 1),
            candidate("second", 1),
            candidate("third", 1),
        ];

        let selection = select_best(&provider, &candidates, Some("NTb")).unwrap();
        assert_eq!(selection.candidate.slug, "third");
        assert_eq!(selection.method, SelectionMethod::GeneralQuery);
    }

    #[test]
    fn test_exhaustive_scan_labels_group_matches() {
        // The group-matching candidate fails resolution in pass 1 but
        // succeeds when retried in the exhaustive pass.
        let provider = ScriptedProvider::with_failures(&[
            ("release-ntb", 1),
            ("plain-release", usize::MAX),
        ]);
        let candidates = vec![candidate("plain-release", 1), candidate("release-ntb", 1)];

        let selection = select_best(&provider, &candidates, Some("NTb")).unwrap();
        assert_eq!(selection.candidate.slug, "release-ntb");
        assert_eq!(selection.method, SelectionMethod::QueryGroupMatch);
    }

    #[test]
    fn test_no_target_group_goes_straight_to_fallback() {
        let provider = ScriptedProvider::resolving_all();
        let candidates = vec![candidate("whatever", 1)];

        let selection = select_best(&provider, &candidates, None).unwrap();
        assert_eq!(selection.method, SelectionMethod::GeneralQuery);
    }

    #[test]
    fn test_empty_candidate_list_yields_none() {
        let provider = ScriptedProvider::resolving_all();
        assert!(select_best(&provider, &[], Some("NTb")).is_none());
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_nothing_resolvable_yields_none() {
        let provider = ScriptedProvider::with_failures(&[
            ("a", usize::MAX),
            ("b", usize::MAX),
        ]);
        let candidates = vec![candidate("a", 1), candidate("b", 1)];

        assert!(select_best(&provider, &candidates, Some("a")).is_none());
    }

    #[test]
    fn test_normalization_ignores_separators_and_case() {
        assert_eq!(normalize("The.Group-X"), "thegroupx");
        assert_eq!(normalize("the group_x"), "thegroupx");

        let provider = ScriptedProvider::resolving_all();
        let candidates = vec![candidate("Movie.2020.The_Group-X", 1)];

        let selection = select_best(&provider, &candidates, Some("The.Group-X")).unwrap();
        assert_eq!(selection.method, SelectionMethod::QueryGroupMatch);
    }

    #[test]
    fn test_hash_selection_takes_first_resolvable() {
        let provider = ScriptedProvider::with_failures(&[("first", usize::MAX)]);
        let candidates = vec![
            candidate("first", 1),
            candidate("fileless", 0),
            candidate("second", 2),
        ];

        let selection = select_by_hash(&provider, &candidates).unwrap();
        assert_eq!(selection.candidate.slug, "second");
        assert_eq!(selection.method, SelectionMethod::Hash);
        assert_eq!(selection.method.as_str(), "hash");
        assert_eq!(provider.calls(), vec!["first", "second"]);
    }

    #[test]
    fn test_hash_selection_empty_list() {
        let provider = ScriptedProvider::resolving_all();
        assert!(select_by_hash(&provider, &[]).is_none());
    }
}
