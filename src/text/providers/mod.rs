//! Text generation providers.

mod gemini;

pub use gemini::{GeminiTextModel, GeminiTextProvider, GeminiTextProviderBuilder};
