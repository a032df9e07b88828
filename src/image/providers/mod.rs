//! Image generation providers.

mod gemini;

pub use gemini::{GeminiImageModel, GeminiImageProvider, GeminiImageProviderBuilder};
