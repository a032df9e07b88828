#![warn(missing_docs)]
//! Weather Canvas - stylized AI weather cards for any city.
//!
//! Pick a city, condition, temperature, date and art style; Gemini renders
//! the scene and this crate bakes the weather overlay into the exported PNG.
//!
//! # Quick Start
//!
//! ```no_run
//! use weather_canvas::{
//!     CanvasSession, FontSet, GeminiImageProvider, GeminiTextProvider, ImageStyle,
//! };
//!
//! #[tokio::main]
//! async fn main() -> weather_canvas::Result<()> {
//!     let text = GeminiTextProvider::builder().build()?;
//!     let image = GeminiImageProvider::builder().build()?;
//!     let mut session = CanvasSession::new(text, image);
//!
//!     session.select_city("Tokyo, Japan").await;
//!     session.set_style(ImageStyle::Cyberpunk);
//!
//!     if session.generate().await?.is_some() {
//!         let fonts = FontSet::discover(None, None).ok();
//!         let export = session.export(std::path::Path::new("."), fonts.as_ref())?;
//!         println!("saved {}", export.path().display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`prompt`]: scene prompt construction
//! - [`fetcher`]: trend and live-weather lookups with a search-grounded first try
//! - [`requester`]: one-shot image generation
//! - [`compositor`]: overlay layout, rasterization and export
//! - [`session`]: state threading across the steps above

pub mod compositor;
mod config;
mod error;
pub mod fetcher;
mod gemini;
pub mod image;
pub mod prompt;
pub mod requester;
pub mod session;
pub mod text;
pub mod weather;

// Re-export error types at crate root
pub use error::{CanvasError, Result};

pub use config::{GeminiConfig, API_BASE_ENV_VAR, API_KEY_ENV_VARS, DEFAULT_API_BASE};

pub use compositor::{download_filename, export, Export, FontSet, OverlayLayout, Theme};
pub use fetcher::WeatherFetcher;
pub use image::providers::{GeminiImageModel, GeminiImageProvider, GeminiImageProviderBuilder};
pub use image::{GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat, ImageProvider};
pub use prompt::{image_prompt, scene_prompt};
pub use requester::ImageRequester;
pub use session::CanvasSession;
pub use text::providers::{GeminiTextModel, GeminiTextProvider, GeminiTextProviderBuilder};
pub use text::{TextProvider, TextRequest};
pub use weather::{
    GeneratedCanvas, ImageStyle, TemperatureUnit, TrendingItem, WeatherCondition, WeatherState,
    WeatherUpdate,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CanvasError, Result};
    pub use crate::image::{GeneratedImage, ImageProvider};
    pub use crate::session::CanvasSession;
    pub use crate::text::TextProvider;
    pub use crate::weather::{ImageStyle, TemperatureUnit, WeatherCondition, WeatherState};
    pub use crate::{GeminiImageProvider, GeminiTextProvider};
}
