//! API configuration resolved from builders and the environment.

use crate::error::{CanvasError, Result};
use std::time::Duration;

/// Public Gemini REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 3] = ["GOOGLE_API_KEY", "GEMINI_API_KEY", "API_KEY"];

/// Overrides the API base URL (proxies, tests).
pub const API_BASE_ENV_VAR: &str = "WEATHER_CANVAS_API_BASE";

/// Default request timeout. Image generation can take a while.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings shared by the Gemini providers.
#[derive(Clone)]
pub struct GeminiConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Resolves a config. Explicit values win over the environment.
    pub fn resolve(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(api_key_from_env)
            .ok_or_else(|| {
                CanvasError::Auth(format!(
                    "{} not set and no API key provided",
                    API_KEY_ENV_VARS.join("/")
                ))
            })?;

        let base_url = base_url
            .or_else(|| env_non_empty(API_BASE_ENV_VAR))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `generateContent` endpoint for a model.
    pub(crate) fn generate_content_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Builds an HTTP client honoring the timeout.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder().timeout(self.timeout).build()?)
    }
}

fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS.iter().find_map(|var| env_non_empty(var))
}

pub(crate) fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
