//! SerpAPI-backed search client.
//!
//! Talks to the SerpAPI `search` endpoint with the `google_shopping` and
//! `google` engines. Every request carries a fixed timeout so a stalled
//! search degrades to a per-agent failure instead of hanging the pipeline.

use crate::search::{OrganicHit, SearchClient, ShoppingItem};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for [`SerpApiClient`].
#[derive(Debug, Clone)]
pub struct SerpApiConfig {
    /// API key for the search backend.
    pub api_key: String,
    /// Endpoint base URL. Overridable so tests can point at a local mock.
    pub base_url: String,
    /// Interface language parameter (`hl`).
    pub hl: String,
    /// Geolocation parameter (`gl`).
    pub gl: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://serpapi.com/search".to_string(),
            hl: "en".to_string(),
            gl: "in".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Search client backed by SerpAPI.
pub struct SerpApiClient {
    http: reqwest::Client,
    config: SerpApiConfig,
}

#[derive(Debug, Deserialize)]
struct ShoppingResponse {
    #[serde(default)]
    shopping_results: Vec<ShoppingItem>,
}

#[derive(Debug, Deserialize)]
struct WebResponse {
    #[serde(default)]
    organic_results: Vec<OrganicHit>,
}

impl SerpApiClient {
    /// Create a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] when the API key is empty or the
    /// HTTP client cannot be constructed.
    pub fn new(config: SerpApiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(AppError::Configuration(
                "SerpAPI key is empty; set the configured API key env var".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        engine: &str,
        query: &str,
    ) -> Result<T> {
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("engine", engine),
                ("q", query),
                ("hl", self.config.hl.as_str()),
                ("gl", self.config.gl.as_str()),
                ("api_key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Request to search backend failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Search(format!(
                "Search backend returned {status} for engine '{engine}'"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Search(format!("Invalid search response: {e}")))
    }
}

#[async_trait]
impl SearchClient for SerpApiClient {
    async fn shopping_search(&self, query: &str, max_results: usize) -> Result<Vec<ShoppingItem>> {
        let mut response: ShoppingResponse = self.get_json("google_shopping", query).await?;
        response.shopping_results.truncate(max_results);
        tracing::debug!(
            query,
            results = response.shopping_results.len(),
            "shopping search complete"
        );
        Ok(response.shopping_results)
    }

    async fn web_search(&self, query: &str, max_results: usize) -> Result<Vec<OrganicHit>> {
        let mut response: WebResponse = self.get_json("google", query).await?;
        response.organic_results.truncate(max_results);
        tracing::debug!(
            query,
            results = response.organic_results.len(),
            "web search complete"
        );
        Ok(response.organic_results)
    }
}
