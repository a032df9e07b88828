//! Bakes the weather overlay into the generated image for export.
//!
//! The overlay (city, temperature and date) is laid out relative to the
//! image width, so a canvas keeps its proportions at any resolution. Dark
//! styles get a top gradient and shadowed white text; light styles get plain
//! dark text.

mod font;
mod layout;
mod raster;

pub use font::{FontSet, BOLD_FONT_ENV_VAR, REGULAR_FONT_ENV_VAR};
pub use layout::{
    Gradient, OverlayLayout, Shadow, TextLine, Theme, Weight, DARK_PRIMARY, DARK_SECONDARY,
    DARK_SHADOW, LIGHT_PRIMARY, LIGHT_SECONDARY,
};
pub use raster::{apply_gradient, measure_text_width, render};

use crate::error::{CanvasError, Result};
use crate::weather::WeatherState;
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    /// The overlay was composited into the image.
    Composited(PathBuf),
    /// Compositing failed; the untouched original was written instead.
    Raw(PathBuf),
}

impl Export {
    /// Path of the written file.
    pub fn path(&self) -> &Path {
        match self {
            Self::Composited(path) | Self::Raw(path) => path,
        }
    }

    /// True when the overlay made it into the file.
    pub fn is_composited(&self) -> bool {
        matches!(self, Self::Composited(_))
    }
}

/// `WeatherCanvas-{city without whitespace}-{epoch ms}.png`.
pub fn download_filename(state: &WeatherState, timestamp_ms: i64) -> String {
    let city: String = state
        .display_city()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("WeatherCanvas-{city}-{timestamp_ms}.png")
}

/// Name used when the raw image is saved instead.
pub fn fallback_filename(state: &WeatherState) -> String {
    format!("weather-canvas-{}.png", state.display_city())
}

/// Current time in epoch milliseconds.
pub fn timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Decodes the image at native resolution and paints the overlay on it.
pub fn compose(image_bytes: &[u8], state: &WeatherState, fonts: &FontSet) -> Result<RgbaImage> {
    let mut canvas = image::load_from_memory(image_bytes)?.to_rgba8();
    let layout = OverlayLayout::for_state(state, canvas.width(), canvas.height());
    tracing::debug!(
        width = layout.width,
        height = layout.height,
        theme = ?layout.theme,
        "compositing overlay"
    );
    render(&mut canvas, &layout, fonts);
    Ok(canvas)
}

/// Encodes a canvas as PNG.
pub fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(canvas).write_to(&mut buf, image::ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Composites and encodes in one step.
pub fn compose_png(image_bytes: &[u8], state: &WeatherState, fonts: &FontSet) -> Result<Vec<u8>> {
    encode_png(compose(image_bytes, state, fonts)?)
}

/// Writes the composited canvas into `out_dir`.
///
/// Any failure up to and including writing the composited PNG, a missing
/// font among them, falls back to writing the original bytes untouched.
/// Only a failed raw write is returned as an error.
pub fn export(
    image_bytes: &[u8],
    state: &WeatherState,
    fonts: Option<&FontSet>,
    out_dir: &Path,
    timestamp_ms: i64,
) -> Result<Export> {
    let composited = fonts
        .ok_or_else(|| CanvasError::Font("no font available for overlay".into()))
        .and_then(|fonts| compose_png(image_bytes, state, fonts))
        .and_then(|png| {
            let path = out_dir.join(download_filename(state, timestamp_ms));
            std::fs::write(&path, png)?;
            Ok(path)
        });

    match composited {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "wrote composited canvas");
            Ok(Export::Composited(path))
        }
        Err(e) => {
            tracing::warn!(error = %e, "canvas composition failed, saving raw image");
            let path = out_dir.join(fallback_filename(state));
            std::fs::write(&path, image_bytes)?;
            Ok(Export::Raw(path))
        }
    }
}
