//! Video discovery module
//!
//! This module scans a folder recursively and collects all video files,
//! identified by their extension (`.mp4`, `.mkv`, `.avi`, `.mov`,
//! case-insensitive).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions recognized as video files
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov"];

/// Errors that can occur during video discovery
#[derive(Debug, Error)]
pub enum VideoScanError {
    /// Path is not a directory
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Failed to read directory
    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to read directory entry
    #[error("Failed to read directory entry: {0}")]
    ReadEntryFailed(#[from] io::Error),
}

/// Represents a discovered video file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    /// Path to the video file
    pub path: PathBuf,
}

impl VideoFile {
    /// Returns the filename without its extension
    ///
    /// This is the string all metadata guessing and query building works
    /// from, and the base name of the subtitle file written next to the
    /// video.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Returns the path a subtitle for this video would be saved at
    ///
    /// The subtitle lives in the same directory as the video, named
    /// `<stem>.<lang>.srt` with a lowercase language code.
    pub fn subtitle_path(&self, language: &str) -> PathBuf {
        self.path
            .with_file_name(format!("{}.{}.srt", self.stem(), language.to_lowercase()))
    }
}

/// Scans a directory recursively to find all video files
///
/// # Arguments
///
/// * `dir_path` - The directory path to scan
///
/// # Returns
///
/// A vector of `VideoFile` structs for all discovered videos, or an error if
/// the directory cannot be read.
pub(crate) fn scan_for_videos(dir_path: &Path) -> Result<Vec<VideoFile>, VideoScanError> {
    let mut video_files = Vec::new();
    scan_directory_recursive(dir_path, &mut video_files)?;
    // Directory iteration order is platform dependent; sort for a stable
    // batch order.
    video_files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(video_files)
}

/// Recursively scans a directory and collects video files
fn scan_directory_recursive(
    dir_path: &Path,
    video_files: &mut Vec<VideoFile>,
) -> Result<(), VideoScanError> {
    if !dir_path.is_dir() {
        return Err(VideoScanError::NotADirectory(dir_path.to_path_buf()));
    }

    for entry in fs::read_dir(dir_path).map_err(|e| VideoScanError::ReadDirectoryFailed {
        path: dir_path.to_path_buf(),
        source: e,
    })? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, video_files)?;
        } else if path.is_file() && has_video_extension(&path) {
            video_files.push(VideoFile { path });
        }
    }

    Ok(())
}

/// Checks whether a path carries a recognized video extension
fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
