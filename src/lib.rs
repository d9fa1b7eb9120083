//! subfetch - Find and download matching subtitles for local video files
//!
//! This library scans a folder for videos, derives identifying signals from
//! each one (content hash and filename metadata), queries an
//! OpenSubtitles-compatible service with progressively looser searches, picks
//! the best candidate with a verified download link, and saves it alongside
//! the video.

mod config;
mod event_log;
mod fingerprint;
mod metadata;
mod query;
mod saver;
mod search;
mod selector;
mod video_scanner;

use event_log::EventLog;
use fingerprint::compute_fingerprint;
use metadata::{guess_from_name, release_group_from_suffix};
use query::build_text_query;
use saver::save_subtitle;
use search::{Candidate, OpenSubtitlesProvider, SearchQuery, SubtitleProvider};
use selector::{select_best, select_by_hash};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// Re-export error types
pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use saver::SaveError;
pub use video_scanner::VideoScanError;

// Re-export pipeline types consumed by the binary
pub use metadata::GuessedMetadata;
pub use selector::SelectionMethod;
pub use video_scanner::VideoFile;

/// Timeout for subtitle payload downloads
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Progress event emitted while fetching subtitles
///
/// These events allow library users to track progress and decide how chatty
/// the output should be; the library itself never prints.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Scanning the folder for video files
    ScanningVideos,

    /// Video files found
    VideosFound { count: usize },

    /// Processing a specific video file
    ProcessingVideo {
        index: usize,
        total: usize,
        video_path: PathBuf,
    },

    /// A subtitle already exists for this video; skipping without network
    SubtitleExists { subtitle_path: PathBuf },

    /// Filename metadata was guessed for the current video
    MetadataGuessed {
        metadata: GuessedMetadata,
        release_group: Option<String>,
    },

    /// Content fingerprint computed; trying hash-based search first
    SearchingByHash { hash: String },

    /// Fingerprint unavailable (small file or read error); text search only
    FingerprintUnavailable,

    /// Issuing a text search with the given query
    SearchingByQuery { query: String },

    /// Search returned this many candidates
    CandidatesReceived { count: usize },

    /// Per-candidate diagnostics for one search result
    CandidateDetails {
        index: usize,
        slug: String,
        file_count: usize,
    },

    /// Subtitle downloaded and saved
    SubtitleSaved {
        subtitle_path: PathBuf,
        method: SelectionMethod,
    },

    /// A chosen subtitle could not be downloaded or saved
    SaveFailed { video_name: String, message: String },

    /// All search tiers exhausted without a usable candidate
    NoSubtitlesFound { video_name: String },

    /// Batch complete
    Complete { saved_count: usize },
}

/// Final status of one processed video
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    /// A subtitle was downloaded and saved
    Saved {
        subtitle_path: PathBuf,
        method: SelectionMethod,
    },
    /// A subtitle already existed; nothing was done
    AlreadyPresent,
    /// No resolvable candidate was found in any search tier
    NotFound,
    /// A candidate was selected but the download or write failed
    SaveFailed,
}

/// Report for one video of the batch
#[derive(Debug, Clone, PartialEq)]
pub struct VideoOutcome {
    /// The video that was processed
    pub video: VideoFile,
    /// What happened for it
    pub status: OutcomeStatus,
}

/// Top-level error type for subfetch operations
///
/// Only batch-fatal conditions surface here; per-video failures are reported
/// through [`VideoOutcome`] and [`ProgressEvent`] instead.
#[derive(Debug, Error)]
pub enum SubfetchError {
    /// Error while scanning for video files
    #[error("Video scan error: {0}")]
    VideoScan(#[from] VideoScanError),

    /// The HTTP client could not be initialized
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Fetches subtitles for every video file under a folder
///
/// Scans the folder recursively, then processes videos one at a time: skip if
/// a subtitle already exists, otherwise search by content hash first and by
/// text query second, select the best resolvable candidate, and save it next
/// to the video as `<stem>.<lang>.srt`.
///
/// Per-video failures never abort the batch; the returned outcomes record
/// what happened for each video.
///
/// # Arguments
///
/// * `folder` - The folder to scan for video files
/// * `config` - Runtime configuration (API key, language, log file)
/// * `progress_callback` - Closure called with progress events (can be empty
///   for silent operation)
///
/// # Examples
///
/// ```no_run
/// use subfetch::{fetch_subtitles, Config, ProgressEvent, DEFAULT_CONFIG_PATH};
/// use std::path::Path;
///
/// let config = Config::load(Path::new(DEFAULT_CONFIG_PATH)).unwrap();
/// let outcomes = fetch_subtitles(Path::new("/media/downloads"), &config, |event| {
///     if let ProgressEvent::SubtitleSaved { subtitle_path, .. } = event {
///         println!("Saved {}", subtitle_path.display());
///     }
/// }).unwrap();
/// ```
pub fn fetch_subtitles<F>(
    folder: &Path,
    config: &Config,
    mut progress_callback: F,
) -> Result<Vec<VideoOutcome>, SubfetchError>
where
    F: FnMut(ProgressEvent),
{
    let log = EventLog::new(&config.log_file);
    let provider = OpenSubtitlesProvider::new(&config.api_key, log.clone())?;
    let download_client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()?;

    progress_callback(ProgressEvent::ScanningVideos);
    let videos = video_scanner::scan_for_videos(folder)?;
    progress_callback(ProgressEvent::VideosFound {
        count: videos.len(),
    });

    let mut outcomes = Vec::new();

    for (index, video) in videos.iter().enumerate() {
        progress_callback(ProgressEvent::ProcessingVideo {
            index,
            total: videos.len(),
            video_path: video.path.clone(),
        });

        let status = process_video(
            video,
            config,
            &provider,
            &download_client,
            &log,
            &mut progress_callback,
        );
        outcomes.push(VideoOutcome {
            video: video.clone(),
            status,
        });
    }

    let saved_count = outcomes
        .iter()
        .filter(|outcome| matches!(outcome.status, OutcomeStatus::Saved { .. }))
        .count();
    progress_callback(ProgressEvent::Complete { saved_count });

    Ok(outcomes)
}

/// Runs the search/select/save pipeline for a single video
fn process_video<F>(
    video: &VideoFile,
    config: &Config,
    provider: &dyn SubtitleProvider,
    download_client: &reqwest::blocking::Client,
    log: &EventLog,
    progress_callback: &mut F,
) -> OutcomeStatus
where
    F: FnMut(ProgressEvent),
{
    let subtitle_path = video.subtitle_path(&config.language);

    // Idempotency: an existing subtitle means no network activity at all.
    if subtitle_path.exists() {
        progress_callback(ProgressEvent::SubtitleExists {
            subtitle_path: subtitle_path.clone(),
        });
        return OutcomeStatus::AlreadyPresent;
    }

    let name = video.stem();
    let metadata = guess_from_name(name);
    let release_group = metadata
        .release_group
        .clone()
        .or_else(|| release_group_from_suffix(name));

    log.append(&format!(
        "Processing {}, release_group='{}'",
        name,
        release_group.as_deref().unwrap_or("")
    ));
    progress_callback(ProgressEvent::MetadataGuessed {
        metadata: metadata.clone(),
        release_group: release_group.clone(),
    });

    // Tier 1: content-hash search. An exact-content match needs no
    // release-group filtering.
    match compute_fingerprint(&video.path) {
        Some(hash) => {
            progress_callback(ProgressEvent::SearchingByHash { hash: hash.clone() });

            let candidates = provider.search(&SearchQuery::by_hash(hash, &config.language));
            report_candidates(&candidates, log, progress_callback);

            if let Some(selection) = select_by_hash(provider, &candidates) {
                log.append(&format!(
                    "Selected '{}' via {}",
                    selection.candidate.slug, selection.method
                ));
                match save_subtitle(
                    download_client,
                    &subtitle_path,
                    &selection.link,
                    selection.method,
                    log,
                ) {
                    Ok(()) => {
                        progress_callback(ProgressEvent::SubtitleSaved {
                            subtitle_path: subtitle_path.clone(),
                            method: selection.method,
                        });
                        return OutcomeStatus::Saved {
                            subtitle_path,
                            method: selection.method,
                        };
                    }
                    Err(e) => {
                        // A failed save of a hash result still leaves the
                        // text tier to try.
                        progress_callback(ProgressEvent::SaveFailed {
                            video_name: name.to_string(),
                            message: e.to_string(),
                        });
                    }
                }
            } else if !candidates.is_empty() {
                log.append("Hash results had no usable file link");
            }
        }
        None => progress_callback(ProgressEvent::FingerprintUnavailable),
    }

    // Tier 2: text search with release-group preference.
    let query = build_text_query(&metadata, name);
    progress_callback(ProgressEvent::SearchingByQuery {
        query: query.clone(),
    });

    let candidates = provider.search(&SearchQuery::by_text(&query, &config.language));
    log.append(&format!(
        "Received {} results for query '{}'",
        candidates.len(),
        query
    ));
    report_candidates(&candidates, log, progress_callback);

    let Some(selection) = select_best(provider, &candidates, release_group.as_deref()) else {
        log.append(&format!("No subtitles found for {}", name));
        progress_callback(ProgressEvent::NoSubtitlesFound {
            video_name: name.to_string(),
        });
        return OutcomeStatus::NotFound;
    };
    log.append(&format!(
        "Selected '{}' via {}",
        selection.candidate.slug, selection.method
    ));

    match save_subtitle(
        download_client,
        &subtitle_path,
        &selection.link,
        selection.method,
        log,
    ) {
        Ok(()) => {
            progress_callback(ProgressEvent::SubtitleSaved {
                subtitle_path: subtitle_path.clone(),
                method: selection.method,
            });
            OutcomeStatus::Saved {
                subtitle_path,
                method: selection.method,
            }
        }
        Err(e) => {
            progress_callback(ProgressEvent::SaveFailed {
                video_name: name.to_string(),
                message: e.to_string(),
            });
            OutcomeStatus::SaveFailed
        }
    }
}

/// Emits count and per-candidate diagnostics for one search
fn report_candidates<F>(candidates: &[Candidate], log: &EventLog, progress_callback: &mut F)
where
    F: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::CandidatesReceived {
        count: candidates.len(),
    });

    for (index, candidate) in candidates.iter().enumerate() {
        log.append(&format!(
            "Result {} slug='{}' files={}",
            index + 1,
            candidate.slug,
            candidate.files.len()
        ));
        progress_callback(ProgressEvent::CandidateDetails {
            index: index + 1,
            slug: candidate.slug.clone(),
            file_count: candidate.files.len(),
        });
    }
}
