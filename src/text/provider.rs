//! Text provider trait.

use crate::error::Result;
use async_trait::async_trait;

/// A single-turn text generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    /// The instruction prompt.
    pub prompt: String,
    /// Whether the model may consult live web search.
    pub grounded: bool,
}

impl TextRequest {
    /// A request that may use live search.
    pub fn grounded(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            grounded: true,
        }
    }

    /// A request limited to the model's own knowledge.
    pub fn ungrounded(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            grounded: false,
        }
    }
}

/// Trait for text generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generates text for the request. `Ok(None)` means the call succeeded
    /// but the model produced no text.
    async fn generate_text(&self, request: &TextRequest) -> Result<Option<String>>;

    /// Returns the model identifier, for logging.
    fn model(&self) -> &str;
}
