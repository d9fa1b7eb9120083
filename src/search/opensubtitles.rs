/// OpenSubtitles provider implementation.
use super::api_types::{DownloadResponse, SearchResponse};
use super::{Candidate, QueryKind, SearchQuery, SubtitleFileRef, SubtitleProvider};
use crate::event_log::EventLog;
use serde_json::json;
use std::time::Duration;

/// User agent identifying this client to the service
const USER_AGENT: &str = concat!("subfetch v", env!("CARGO_PKG_VERSION"));

/// Base URL of the OpenSubtitles REST API
const API_BASE_URL: &str = "https://api.opensubtitles.com/api/v1";

/// Timeout applied to every request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Subtitle provider backed by the OpenSubtitles REST API
///
/// Authentication is an `Api-Key` header plus an identifying `User-Agent`.
/// Every HTTP call is logged to the event log with method, URL and status.
pub(crate) struct OpenSubtitlesProvider {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    log: EventLog,
}

impl OpenSubtitlesProvider {
    /// Creates a provider using the given API key
    ///
    /// Fails only when the underlying HTTP client cannot be constructed,
    /// which is a startup-fatal condition.
    pub fn new(api_key: impl Into<String>, log: EventLog) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: API_BASE_URL.to_string(),
            log,
        })
    }

    /// Attaches the authentication headers to a request
    fn with_headers(&self, request: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        request
            .header("Api-Key", self.api_key.as_str())
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
    }
}

impl SubtitleProvider for OpenSubtitlesProvider {
    fn search(&self, query: &SearchQuery) -> Vec<Candidate> {
        let url = format!("{}/subtitles", self.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("languages[]", query.language.clone()),
            ("order_by", "downloads".to_string()),
            ("order_direction", "desc".to_string()),
            ("limit", query.limit.to_string()),
        ];
        match &query.kind {
            QueryKind::MovieHash(hash) => params.push(("moviehash", hash.clone())),
            QueryKind::Text(text) => params.push(("query", text.clone())),
        }

        let response = match self.with_headers(self.client.get(&url)).query(&params).send() {
            Ok(response) => response,
            Err(e) => {
                self.log.http("GET", &url, &format!("error: {}", e));
                return Vec::new();
            }
        };

        let status = response.status();
        self.log
            .http("GET", response.url().as_str(), &status.as_u16().to_string());

        if !status.is_success() {
            return Vec::new();
        }

        let parsed: SearchResponse = match response.json() {
            Ok(parsed) => parsed,
            Err(e) => {
                self.log.append(&format!("Malformed search response: {}", e));
                return Vec::new();
            }
        };

        parsed
            .data
            .into_iter()
            .map(|result| Candidate {
                slug: result.attributes.slug,
                files: result
                    .attributes
                    .files
                    .into_iter()
                    .map(|file| SubtitleFileRef {
                        file_id: file.file_id,
                    })
                    .collect(),
            })
            .collect()
    }

    fn resolve_link(&self, candidate: &Candidate) -> Option<String> {
        // First file by list order; no ranking among files within a
        // candidate.
        let file = candidate.files.first()?;
        let url = format!("{}/download", self.base_url);

        let response = match self
            .with_headers(self.client.post(&url))
            .json(&json!({ "file_id": file.file_id }))
            .send()
        {
            Ok(response) => response,
            Err(e) => {
                self.log.http("POST", &url, &format!("error: {}", e));
                return None;
            }
        };

        let status = response.status();
        self.log.http("POST", &url, &status.as_u16().to_string());

        if !status.is_success() {
            return None;
        }

        let parsed: DownloadResponse = match response.json() {
            Ok(parsed) => parsed,
            Err(e) => {
                self.log
                    .append(&format!("Malformed download response: {}", e));
                return None;
            }
        };

        parsed.link
    }
}
