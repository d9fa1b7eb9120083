//! Subtitle persistence module
//!
//! Fetches a resolved download URL, validates that the payload is actually a
//! subtitle (the service can return an error or login page with a 200
//! status), and writes it atomically next to the video. The caller has
//! already verified that the target path does not exist.

use crate::event_log::EventLog;
use crate::selector::SelectionMethod;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How many leading bytes are inspected for HTML markers
const HTML_SNIFF_LEN: usize = 200;

/// Errors that can occur while downloading and saving a subtitle
///
/// All of these are per-video failures: they are reported and logged, and
/// batch processing continues with the next video.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The download request itself failed
    #[error("Failed to download subtitle from {url}: {source}")]
    RequestFailed { url: String, source: reqwest::Error },

    /// The download returned a non-success status
    #[error("Download returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The payload looks like an HTML page rather than a subtitle
    #[error("Received HTML instead of subtitle content")]
    HtmlPayload,

    /// The subtitle could not be written to disk
    #[error("Failed to write subtitle file {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },
}

/// Downloads a subtitle and saves it to the given path
///
/// On success the provenance method is logged alongside the file name. Every
/// failure is logged as well before being returned.
pub(crate) fn save_subtitle(
    client: &reqwest::blocking::Client,
    path: &Path,
    url: &str,
    method: SelectionMethod,
    log: &EventLog,
) -> Result<(), SaveError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let response = client
        .get(url)
        .send()
        .map_err(|e| {
            log.http("GET", url, &format!("error: {}", e));
            SaveError::RequestFailed {
                url: url.to_string(),
                source: e,
            }
        })?;

    let status = response.status();
    log.http("GET", url, &status.as_u16().to_string());

    if !status.is_success() {
        log.append(&format!(
            "Failed download {} url={} status={}",
            file_name,
            url,
            status.as_u16()
        ));
        return Err(SaveError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().map_err(|e| SaveError::RequestFailed {
        url: url.to_string(),
        source: e,
    })?;

    match validate_and_write(path, &bytes) {
        Ok(()) => {
            log.append(&format!("{}: subtitle downloaded via {}", file_name, method));
            Ok(())
        }
        Err(SaveError::HtmlPayload) => {
            log.append(&format!(
                "Received HTML when fetching subtitle for {} url={}",
                file_name, url
            ));
            Err(SaveError::HtmlPayload)
        }
        Err(e) => {
            log.append(&format!("Failed to save subtitle for {}: {}", file_name, e));
            Err(e)
        }
    }
}

/// Validates a downloaded payload and writes it atomically
///
/// The write goes to a `.tmp` sibling first and is renamed into place, so a
/// crash mid-write never leaves a partial `.srt` behind.
pub(crate) fn validate_and_write(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    if looks_like_html(bytes) {
        return Err(SaveError::HtmlPayload);
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, bytes).map_err(|e| SaveError::WriteFailed {
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        SaveError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

/// Checks whether a payload looks like an HTML document
///
/// Inspects the first 200 bytes case-insensitively for a doctype declaration
/// or an opening html tag.
pub(crate) fn looks_like_html(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HTML_SNIFF_LEN)];
    let head = String::from_utf8_lossy(head).to_lowercase();
    head.trim_start().starts_with("<!doctype") || head.contains("<html")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT_SAMPLE: &[u8] = b"1\n00:00:01,000 --> 00:00:04,000\nHello there.\n";

    #[test]
    fn test_doctype_payload_is_html() {
        assert!(looks_like_html(b"<!DOCTYPE html><html><body>Login</body></html>"));
        assert!(looks_like_html(b"  \n<!doctype HTML>"));
    }

    #[test]
    fn test_html_tag_payload_is_html() {
        assert!(looks_like_html(b"<html lang=\"en\"><head></head>"));
    }

    #[test]
    fn test_html_marker_beyond_sniff_window_is_ignored() {
        let mut payload = SRT_SAMPLE.to_vec();
        payload.resize(300, b'.');
        payload.extend_from_slice(b"<html>");
        assert!(!looks_like_html(&payload));
    }

    #[test]
    fn test_srt_payload_is_not_html() {
        assert!(!looks_like_html(SRT_SAMPLE));
        assert!(!looks_like_html(b""));
    }

    #[test]
    fn test_html_payload_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.en.srt");

        let result = validate_and_write(&path, b"<!doctype html><html></html>");
        assert!(matches!(result, Err(SaveError::HtmlPayload)));
        assert!(!path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_valid_payload_is_written_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.en.srt");

        validate_and_write(&path, SRT_SAMPLE).unwrap();

        assert_eq!(fs::read(&path).unwrap(), SRT_SAMPLE);
        assert!(!path.with_extension("tmp").exists());
    }
}
