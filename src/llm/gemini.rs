//! Gemini LLM client implementation.
//!
//! Talks to the Gemini `generateContent` REST endpoint. Requests carry a
//! fixed timeout; a slow or failed model call surfaces as [`AppError::Llm`]
//! and is contained by the calling stage.

use crate::llm::LlmClient;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for the Gemini API.
    pub api_key: String,
    /// API base URL. Overridable so tests can point at a local mock.
    pub base_url: String,
    /// Model identifier, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.1,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Gemini client for API-based inference.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Create a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] when the API key is empty or the
    /// HTTP client cannot be constructed.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(AppError::Configuration(
                "Gemini API key is empty; set the configured API key env var".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    async fn generate_content(&self, body: serde_json::Value) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Request to Gemini failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Llm(format!("Gemini returned {status}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Invalid Gemini response: {e}")))?;

        extract_text(&parsed)
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: &GenerateResponse) -> Result<String> {
    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AppError::Llm("Gemini returned no text candidates".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": self.config.temperature },
        });
        self.generate_content(body).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": self.config.temperature },
        });
        self.generate_content(body).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
