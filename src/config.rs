//! Configuration loading
//!
//! The tool is configured through a simple `KEY=value` file (conventionally
//! `/opt/subtitles/config.env`). The file is parsed once at startup into an
//! explicit [`Config`] value which is then passed into the library entry
//! point; nothing reads configuration ambiently after that.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/opt/subtitles/config.env";

/// Default subtitle language when the config file does not set one
const DEFAULT_LANGUAGE: &str = "en";

/// Default target for the append-only activity log
const DEFAULT_LOG_FILE: &str = "/var/log/subtitles.log";

/// Errors that can occur while loading configuration
///
/// All of these are fatal: the process reports them and exits before any
/// video is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    /// The config file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The config file is missing the mandatory API key
    #[error("API key is missing in {0}. Please provide your API key as API_KEY=...")]
    MissingApiKey(PathBuf),
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API key sent as the `Api-Key` header on every request
    pub api_key: String,
    /// Language code for subtitle search and output file naming
    pub language: String,
    /// Path of the append-only activity log
    pub log_file: PathBuf,
}

impl Config {
    /// Loads configuration from a `KEY=value` file
    ///
    /// Lines without a `=` and lines starting with `#` are ignored; keys and
    /// values are trimmed. `API_KEY` is mandatory, `DEFAULT_LANG` and
    /// `LOG_FILE` fall back to `"en"` and `/var/log/subtitles.log`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut api_key = None;
        let mut language = None;
        let mut log_file = None;

        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };

            match key.trim() {
                "API_KEY" => api_key = Some(value.trim().to_string()),
                "DEFAULT_LANG" => language = Some(value.trim().to_string()),
                "LOG_FILE" => log_file = Some(PathBuf::from(value.trim())),
                _ => {}
            }
        }

        let api_key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ConfigError::MissingApiKey(path.to_path_buf())),
        };

        Ok(Self {
            api_key,
            language: language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            log_file: log_file.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}
