//! Gemini `generateContent` wire types and transport.
//!
//! Shared by the text and image providers. Only the handful of fields this
//! crate reads or writes are modelled.

use crate::config::GeminiConfig;
use crate::error::{parse_retry_after, sanitize_error_message, CanvasError, Result};
use serde::{Deserialize, Serialize};

/// Finish reasons that mean the output was withheld by a safety filter.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "IMAGE_PROHIBITED_CONTENT",
    "IMAGE_RECITATION",
    "RECITATION",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
];

// Request types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A single-turn request carrying one text part.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![RequestPart {
                    text: prompt.into(),
                }],
            }],
            tools: Vec::new(),
            generation_config: None,
        }
    }

    /// Enables Google Search grounding.
    pub fn with_search_grounding(mut self) -> Self {
        self.tools.push(Tool {
            google_search: GoogleSearch {},
        });
        self
    }

    /// Sets the requested response modalities.
    pub fn with_modalities(mut self, modalities: &[&str]) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_modalities: modalities.iter().map(|m| m.to_string()).collect(),
        });
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
pub(crate) struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

// Response types
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<InlineData>,
    #[serde(default)]
    pub thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl GenerateContentResponse {
    /// Returns the parts of the first candidate, or an error if the
    /// response was blocked.
    pub fn into_parts(self) -> Result<Vec<ResponsePart>> {
        if let Some(ref feedback) = self.prompt_feedback {
            if let Some(ref reason) = feedback.block_reason {
                let msg = feedback
                    .block_reason_message
                    .clone()
                    .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
                return Err(CanvasError::ContentBlocked(msg));
            }
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Ok(Vec::new());
        };

        if let Some(ref finish_reason) = candidate.finish_reason {
            if BLOCKING_FINISH_REASONS.contains(&finish_reason.as_str()) {
                return Err(CanvasError::ContentBlocked(format!(
                    "Content blocked by Gemini safety filter: {}",
                    finish_reason
                )));
            }
        }

        Ok(candidate.content.unwrap_or_default().parts)
    }

    /// Concatenated non-thought text of the first candidate, if any.
    pub fn text(self) -> Result<Option<String>> {
        let text: String = self
            .into_parts()?
            .into_iter()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| p.text)
            .collect();

        Ok(if text.trim().is_empty() { None } else { Some(text) })
    }
}

/// Sends a `generateContent` request and decodes the response.
pub(crate) async fn generate_content(
    client: &reqwest::Client,
    config: &GeminiConfig,
    model: &str,
    body: &GenerateContentRequest,
) -> Result<GenerateContentResponse> {
    let url = config.generate_content_url(model);

    tracing::debug!(model, grounded = !body.tools.is_empty(), "sending generateContent request");

    let response = client
        .post(&url)
        .header("x-goog-api-key", &config.api_key)
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let headers = response.headers().clone();
        let text = response.text().await.unwrap_or_default();
        return Err(parse_error(status.as_u16(), &text, &headers));
    }

    Ok(response.json().await?)
}

/// Maps a non-success HTTP response to a typed error.
pub(crate) fn parse_error(
    status: u16,
    text: &str,
    headers: &reqwest::header::HeaderMap,
) -> CanvasError {
    let text = sanitize_error_message(text);
    if status == 404 {
        return CanvasError::InvalidRequest(
            "Model not found. Verify the model name is correct.".into(),
        );
    }
    if status == 429 {
        let retry_after = parse_retry_after(headers).map(std::time::Duration::from_secs);
        return CanvasError::RateLimited { retry_after };
    }
    if status == 401 || status == 403 {
        return CanvasError::Auth(text);
    }
    let lower = text.to_lowercase();
    if lower.contains("safety")
        || lower.contains("blocked")
        || lower.contains("content_policy")
        || lower.contains("prohibited")
    {
        return CanvasError::ContentBlocked(text);
    }
    CanvasError::Api {
        status,
        message: text,
    }
}
