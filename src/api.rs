//! HTTP client for the recommendation backend.
//!
//! A single endpoint is used: `POST <base>/search` with body
//! `{"text": <query>}`. Requests are single-attempt — no retry, no timeout,
//! no interceptors.

use crate::model::{Game, SearchResponse};
use anyhow::Result;
use serde::Deserialize;

/// Used when neither `--api-url` nor the environment provide a base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable consulted for the backend base URL.
pub const BASE_URL_ENV: &str = "GAMEREC_API_URL";

/// Error body convention of the backend: non-2xx responses carry a JSON
/// object with a human-readable `detail` field.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Client with an explicitly injected base URL.
pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { base_url, client })
    }

    /// Resolution order: CLI override, then `GAMEREC_API_URL`, then the
    /// local development default.
    pub fn resolve_base_url(cli_override: Option<&str>) -> String {
        if let Some(url) = cli_override {
            return url.to_string();
        }
        std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends the free-text query to the backend and returns the games in
    /// backend order. On a non-2xx response the backend's `detail` message
    /// becomes the error's display text, verbatim.
    pub fn search(&self, text: &str) -> Result<Vec<Game>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "text": text }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            anyhow::bail!("{}", error_detail(status, &body));
        }

        let parsed: SearchResponse = response.json()?;
        Ok(parsed.games)
    }
}

fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.detail)
        .unwrap_or_else(|| format!("Search request failed: {}", status))
}
