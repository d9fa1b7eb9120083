//! Append-only file logging
//!
//! This module provides the persistent activity log: one timestamped line per
//! notable event (HTTP calls, selection diagnostics, download outcomes).
//! Logging is strictly best-effort — a failure to write a log line must never
//! abort the download flow it was reporting on, so all I/O errors are
//! swallowed here.

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Append-only, timestamped activity log
///
/// Every line is prefixed with `[YYYY-MM-DD HH:MM:SS]`. The parent directory
/// is created on demand so a fresh install can log to e.g.
/// `/var/log/subtitles.log` without a setup step.
#[derive(Debug, Clone)]
pub(crate) struct EventLog {
    path: PathBuf,
}

impl EventLog {
    /// Creates a log handle for the given file path
    ///
    /// No I/O happens until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends a single timestamped line to the log file
    ///
    /// Errors (unwritable directory, full disk, ...) are silently ignored:
    /// the log is an observability aid, not a dependency of the pipeline.
    pub fn append(&self, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{}] {}\n", timestamp, message);

        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = file.write_all(line.as_bytes());
        }
    }

    /// Logs an HTTP call in the `<METHOD> <url> => <status>` format
    pub fn http(&self, method: &str, url: &str, status: &str) {
        self.append(&format!("{} {} => {}", method, url, status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_append_writes_timestamped_line() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("subtitles.log");
        let log = EventLog::new(&log_path);

        log.append("hello world");

        let content = fs::read_to_string(&log_path).unwrap();
        let line = content.lines().next().unwrap();
        // "[YYYY-MM-DD HH:MM:SS] hello world"
        assert!(line.starts_with('['));
        assert_eq!(&line[11..12], " ");
        assert_eq!(&line[20..21], "]");
        assert!(line.ends_with("] hello world"));
    }

    #[test]
    fn test_append_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("nested").join("deeper").join("run.log");
        let log = EventLog::new(&log_path);

        log.append("first");
        log.append("second");

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_http_line_format() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("subtitles.log");
        let log = EventLog::new(&log_path);

        log.http("GET", "https://api.example.com/subtitles", "200");

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("GET https://api.example.com/subtitles => 200"));
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        // A directory as the log target makes the open fail; append must
        // swallow that.
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::new(dir.path());
        log.append("this line is dropped");
    }
}
