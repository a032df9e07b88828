//! Turns a weather state into a generated image.

use crate::image::{GeneratedImage, GenerationRequest, ImageProvider};
use crate::prompt::image_prompt;
use crate::weather::WeatherState;

/// Prefix of the data URLs handed to callers.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Sends one image request per call. No retries.
pub struct ImageRequester<P> {
    provider: P,
}

impl<P: ImageProvider> ImageRequester<P> {
    /// Wraps an image provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generates the canvas image, or `None` on any failure.
    pub async fn generate(&self, state: &WeatherState) -> Option<GeneratedImage> {
        let request = GenerationRequest::new(image_prompt(state));
        match self.provider.generate(&request).await {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    city = %state.city,
                    error = %e,
                    "image generation failed"
                );
                None
            }
        }
    }

    /// Generates the canvas image as a `data:image/png;base64,...` URL.
    pub async fn generate_data_url(&self, state: &WeatherState) -> Option<String> {
        let image = self.generate(state).await?;
        Some(format!("{PNG_DATA_URL_PREFIX}{}", image.to_base64()))
    }
}
