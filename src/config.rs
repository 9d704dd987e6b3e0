//! TOML-based configuration.
//!
//! Infrastructure settings (search backend, LLM provider, supervisor tuning)
//! are declared in a TOML file; secrets are referenced by environment
//! variable *name* and resolved at load time, so keys never live in the
//! config file itself. A `.env` file is honored via dotenvy.

use crate::llm::GeminiConfig;
use crate::search::SerpApiConfig;
use crate::supervisor::{DispatchMode, SupervisorConfig};
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Root configuration structure loaded from `shopsage.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopsageConfig {
    /// Search backend settings.
    #[serde(default)]
    pub serpapi: SerpApiSection,
    /// LLM provider settings.
    #[serde(default)]
    pub gemini: GeminiSection,
    /// Supervisor tuning.
    #[serde(default)]
    pub supervisor: SupervisorSection,
}

/// `[serpapi]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpApiSection {
    /// Environment variable holding the API key.
    #[serde(default = "default_serp_key_env")]
    pub api_key_env: String,
    /// Endpoint base URL.
    #[serde(default = "default_serp_base_url")]
    pub base_url: String,
    /// Interface language parameter.
    #[serde(default = "default_hl")]
    pub hl: String,
    /// Geolocation parameter.
    #[serde(default = "default_gl")]
    pub gl: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_serp_key_env() -> String {
    "SERP_API_KEY".to_string()
}

fn default_serp_base_url() -> String {
    "https://serpapi.com/search".to_string()
}

fn default_hl() -> String {
    "en".to_string()
}

fn default_gl() -> String {
    "in".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for SerpApiSection {
    fn default() -> Self {
        Self {
            api_key_env: default_serp_key_env(),
            base_url: default_serp_base_url(),
            hl: default_hl(),
            gl: default_gl(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// `[gemini]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSection {
    /// Environment variable holding the API key.
    #[serde(default = "default_gemini_key_env")]
    pub api_key_env: String,
    /// API base URL.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Model identifier.
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_gemini_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            api_key_env: default_gemini_key_env(),
            base_url: default_gemini_base_url(),
            model: default_gemini_model(),
            temperature: default_temperature(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// `[supervisor]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorSection {
    /// `"concurrent"` (default) or `"sequential"`.
    #[serde(default)]
    pub dispatch: DispatchMode,
    /// Pause between sequential collector calls, in milliseconds.
    #[serde(default = "default_inter_call_delay_ms")]
    pub inter_call_delay_ms: u64,
    /// Overall bound on one supervisor run, in seconds. `0` disables the
    /// bound.
    #[serde(default = "default_run_timeout_secs")]
    pub run_timeout_secs: u64,
}

fn default_inter_call_delay_ms() -> u64 {
    500
}

fn default_run_timeout_secs() -> u64 {
    60
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            dispatch: DispatchMode::default(),
            inter_call_delay_ms: default_inter_call_delay_ms(),
            run_timeout_secs: default_run_timeout_secs(),
        }
    }
}

impl ShopsageConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] when the file cannot be read or
    /// parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&raw).map_err(|e| {
            AppError::Configuration(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Resolve the search client settings, reading the API key from the
    /// configured environment variable. Loads `.env` first when present.
    pub fn serpapi_config(&self) -> Result<SerpApiConfig> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(&self.serpapi.api_key_env).map_err(|_| {
            AppError::Configuration(format!("{} is not set", self.serpapi.api_key_env))
        })?;

        Ok(SerpApiConfig {
            api_key,
            base_url: self.serpapi.base_url.clone(),
            hl: self.serpapi.hl.clone(),
            gl: self.serpapi.gl.clone(),
            timeout: Duration::from_secs(self.serpapi.timeout_secs),
        })
    }

    /// Resolve the LLM client settings, reading the API key from the
    /// configured environment variable. Loads `.env` first when present.
    pub fn gemini_config(&self) -> Result<GeminiConfig> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(&self.gemini.api_key_env).map_err(|_| {
            AppError::Configuration(format!("{} is not set", self.gemini.api_key_env))
        })?;

        Ok(GeminiConfig {
            api_key,
            base_url: self.gemini.base_url.clone(),
            model: self.gemini.model.clone(),
            temperature: self.gemini.temperature,
            timeout: Duration::from_secs(self.gemini.timeout_secs),
        })
    }

    /// Resolve the supervisor tuning settings. A `run_timeout_secs` of `0`
    /// maps to no bound.
    pub fn supervisor_config(&self) -> SupervisorConfig {
        let run_timeout = match self.supervisor.run_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        SupervisorConfig {
            dispatch: self.supervisor.dispatch,
            inter_call_delay: Duration::from_millis(self.supervisor.inter_call_delay_ms),
            run_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_values() {
        let config = ShopsageConfig::default();
        assert_eq!(config.serpapi.api_key_env, "SERP_API_KEY");
        assert_eq!(config.serpapi.timeout_secs, 10);
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.supervisor.dispatch, DispatchMode::Concurrent);
        assert_eq!(config.supervisor.inter_call_delay_ms, 500);
        assert_eq!(config.supervisor.run_timeout_secs, 60);
    }

    #[test]
    fn loads_partial_toml_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[gemini]
model = "gemini-2.0-flash-exp"

[supervisor]
dispatch = "sequential"
inter_call_delay_ms = 250
"#
        )
        .unwrap();

        let config = ShopsageConfig::load(file.path()).unwrap();
        assert_eq!(config.gemini.model, "gemini-2.0-flash-exp");
        assert_eq!(config.supervisor.dispatch, DispatchMode::Sequential);
        assert_eq!(config.supervisor.inter_call_delay_ms, 250);
        // Untouched sections keep defaults.
        assert_eq!(config.serpapi.hl, "en");
        assert_eq!(config.supervisor.run_timeout_secs, 60);
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let result = ShopsageConfig::load("/nonexistent/shopsage.toml");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn supervisor_config_converts_units() {
        let config = ShopsageConfig::default();
        let sup = config.supervisor_config();
        assert_eq!(sup.inter_call_delay, Duration::from_millis(500));
        assert_eq!(sup.run_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn zero_run_timeout_disables_the_bound() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[supervisor]
run_timeout_secs = 0
"#
        )
        .unwrap();

        let config = ShopsageConfig::load(file.path()).unwrap();
        assert_eq!(config.supervisor.run_timeout_secs, 0);
        assert_eq!(config.supervisor_config().run_timeout, None);
    }
}
