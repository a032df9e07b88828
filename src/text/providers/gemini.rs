//! Gemini (Google) text generation provider.

use crate::config::{env_non_empty, GeminiConfig};
use crate::error::Result;
use crate::gemini::{generate_content, GenerateContentRequest};
use crate::text::provider::{TextProvider, TextRequest};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Overrides the text model identifier.
pub const TEXT_MODEL_ENV_VAR: &str = "WEATHER_CANVAS_TEXT_MODEL";

/// Gemini text model variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GeminiTextModel {
    /// Gemini 2.5 Flash (fast, supports search grounding).
    #[default]
    Flash,
    /// Gemini 2.5 Pro.
    Pro,
    /// Any other model identifier.
    Custom(String),
}

impl GeminiTextModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Flash => "gemini-2.5-flash",
            Self::Pro => "gemini-2.5-pro",
            Self::Custom(id) => id,
        }
    }
}

/// Builder for GeminiTextProvider.
#[derive(Debug, Clone, Default)]
pub struct GeminiTextProviderBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<GeminiTextModel>,
    timeout: Option<Duration>,
}

impl GeminiTextProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GOOGLE_API_KEY`, `GEMINI_API_KEY`, then `API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model. Falls back to `WEATHER_CANVAS_TEXT_MODEL`, then Flash.
    pub fn model(mut self, model: GeminiTextModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<GeminiTextProvider> {
        let config = GeminiConfig::resolve(self.api_key, self.base_url, self.timeout)?;
        let model = self
            .model
            .or_else(|| env_non_empty(TEXT_MODEL_ENV_VAR).map(GeminiTextModel::Custom))
            .unwrap_or_default();

        Ok(GeminiTextProvider {
            client: config.http_client()?,
            config,
            model,
        })
    }
}

/// Gemini text generation provider.
pub struct GeminiTextProvider {
    client: reqwest::Client,
    config: GeminiConfig,
    model: GeminiTextModel,
}

impl GeminiTextProvider {
    /// Creates a new `GeminiTextProviderBuilder`.
    pub fn builder() -> GeminiTextProviderBuilder {
        GeminiTextProviderBuilder::new()
    }
}

fn build_request(request: &TextRequest) -> GenerateContentRequest {
    let body = GenerateContentRequest::text(&request.prompt);
    if request.grounded {
        body.with_search_grounding()
    } else {
        body
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate_text(&self, request: &TextRequest) -> Result<Option<String>> {
        let start = Instant::now();
        let body = build_request(request);

        let response = generate_content(&self.client, &self.config, self.model.as_str(), &body)
            .await?;
        let text = response.text()?;

        tracing::debug!(
            model = self.model.as_str(),
            grounded = request.grounded,
            duration_ms = start.elapsed().as_millis() as u64,
            chars = text.as_ref().map_or(0, |t| t.len()),
            "text generation complete"
        );

        Ok(text)
    }

    fn model(&self) -> &str {
        self.model.as_str()
    }
}
