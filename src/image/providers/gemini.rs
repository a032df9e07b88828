//! Gemini (Google) image generation provider.

use crate::config::{env_non_empty, GeminiConfig};
use crate::error::{CanvasError, Result};
use crate::gemini::{generate_content, GenerateContentRequest, ResponsePart};
use crate::image::provider::ImageProvider;
use crate::image::types::{GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat};
use async_trait::async_trait;
use base64::Engine;
use std::time::{Duration, Instant};

/// Overrides the image model identifier.
pub const IMAGE_MODEL_ENV_VAR: &str = "WEATHER_CANVAS_IMAGE_MODEL";

/// Gemini image model variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GeminiImageModel {
    /// Nano Banana - Gemini 2.5 Flash Image (fast, economical).
    #[default]
    NanoBanana,
    /// Nano Banana Pro - Gemini 3 Pro Image (highest quality).
    NanoBananaPro,
    /// Any other model identifier.
    Custom(String),
}

impl GeminiImageModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NanoBanana => "gemini-2.5-flash-image",
            Self::NanoBananaPro => "gemini-3-pro-image-preview",
            Self::Custom(id) => id,
        }
    }
}

/// Builder for GeminiImageProvider.
#[derive(Debug, Clone, Default)]
pub struct GeminiImageProviderBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<GeminiImageModel>,
    timeout: Option<Duration>,
}

impl GeminiImageProviderBuilder {
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

    /// Sets the model. Falls back to `WEATHER_CANVAS_IMAGE_MODEL`, then Nano Banana.
    pub fn model(mut self, model: GeminiImageModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<GeminiImageProvider> {
        let config = GeminiConfig::resolve(self.api_key, self.base_url, self.timeout)?;
        let model = self
            .model
            .or_else(|| env_non_empty(IMAGE_MODEL_ENV_VAR).map(GeminiImageModel::Custom))
            .unwrap_or_default();

        Ok(GeminiImageProvider {
            client: config.http_client()?,
            config,
            model,
        })
    }
}

/// Gemini image generation provider.
pub struct GeminiImageProvider {
    client: reqwest::Client,
    config: GeminiConfig,
    model: GeminiImageModel,
}

impl GeminiImageProvider {
    /// Creates a new `GeminiImageProviderBuilder`.
    pub fn builder() -> GeminiImageProviderBuilder {
        GeminiImageProviderBuilder::new()
    }

    async fn generate_impl(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let start = Instant::now();

        let body =
            GenerateContentRequest::text(&request.prompt).with_modalities(&["TEXT", "IMAGE"]);
        let response =
            generate_content(&self.client, &self.config, self.model.as_str(), &body).await?;

        let (format, data) = first_inline_image(response.into_parts()?)?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            model = self.model.as_str(),
            duration_ms,
            bytes = data.len(),
            "image generation complete"
        );

        Ok(GeneratedImage::new(
            data,
            format,
            GenerationMetadata {
                model: Some(self.model.as_str().to_string()),
                duration_ms: Some(duration_ms),
            },
        ))
    }
}

/// Takes the first part carrying inline image data, in response order.
fn first_inline_image(parts: Vec<ResponsePart>) -> Result<(ImageFormat, Vec<u8>)> {
    let inline_data = parts
        .into_iter()
        .find_map(|p| p.inline_data)
        .ok_or_else(|| {
            CanvasError::UnexpectedResponse("No image data in Gemini response".into())
        })?;

    let data = base64::engine::general_purpose::STANDARD
        .decode(&inline_data.data)
        .map_err(|e| CanvasError::Decode(e.to_string()))?;

    Ok((ImageFormat::from_mime_type(&inline_data.mime_type), data))
}

#[async_trait]
impl ImageProvider for GeminiImageProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        self.generate_impl(request).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GenerateContentResponse;

    fn parts(json: &str) -> Vec<ResponsePart> {
        serde_json::from_str::<GenerateContentResponse>(json)
            .unwrap()
            .into_parts()
            .unwrap()
    }

    #[test]
    fn test_model_as_str() {
        assert_eq!(GeminiImageModel::NanoBanana.as_str(), "gemini-2.5-flash-image");
        assert_eq!(GeminiImageModel::default(), GeminiImageModel::NanoBanana);
        assert_eq!(GeminiImageModel::Custom("x".into()).as_str(), "x");
    }

    #[test]
    fn test_builder_with_explicit_key() {
        let provider = GeminiImageProviderBuilder::new()
            .api_key("test-key")
            .model(GeminiImageModel::NanoBanana)
            .build();
        assert!(provider.is_ok());
    }

    #[test]
    fn test_first_inline_image_skips_text_parts() {
        let parts = parts(
            r#"{"candidates": [{"content": {"parts": [
                {"text": "Here is your city"},
                {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/4AAQ"}},
                {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
            ]}}]}"#,
        );
        let (format, data) = first_inline_image(parts).unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
        assert_eq!(&data[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_no_inline_image_is_error() {
        let parts = parts(r#"{"candidates": [{"content": {"parts": [{"text": "sorry"}]}}]}"#);
        assert!(matches!(
            first_inline_image(parts),
            Err(CanvasError::UnexpectedResponse(_))
        ));
        assert!(first_inline_image(Vec::new()).is_err());
    }

    #[test]
    fn test_bad_base64_is_decode_error() {
        let parts = parts(
            r#"{"candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": "***"}}
            ]}}]}"#,
        );
        assert!(matches!(
            first_inline_image(parts),
            Err(CanvasError::Decode(_))
        ));
    }
}
