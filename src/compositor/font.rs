//! Font discovery for overlay text.

use crate::compositor::layout::Weight;
use crate::config::env_non_empty;
use crate::error::{CanvasError, Result};
use ab_glyph::FontVec;
use std::path::{Path, PathBuf};

/// Path of the bold face.
pub const BOLD_FONT_ENV_VAR: &str = "WEATHER_CANVAS_FONT_BOLD";
/// Path of the regular face. Also used for bold when no bold face is set.
pub const REGULAR_FONT_ENV_VAR: &str = "WEATHER_CANVAS_FONT";

const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Bold and regular faces used by the overlay.
pub struct FontSet {
    bold: FontVec,
    regular: FontVec,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet").finish_non_exhaustive()
    }
}

impl FontSet {
    /// Parses both faces from raw TrueType/OpenType bytes.
    pub fn from_bytes(bold: Vec<u8>, regular: Vec<u8>) -> Result<Self> {
        Ok(Self {
            bold: parse(bold)?,
            regular: parse(regular)?,
        })
    }

    /// Loads faces from files. A missing face falls back to the other one.
    pub fn from_paths(bold: Option<&Path>, regular: Option<&Path>) -> Result<Self> {
        let (bold, regular) = match (bold, regular) {
            (Some(b), Some(r)) => (b, r),
            (Some(b), None) => (b, b),
            (None, Some(r)) => (r, r),
            (None, None) => {
                return Err(CanvasError::Font("no font path given".into()));
            }
        };
        tracing::debug!(bold = %bold.display(), regular = %regular.display(), "loading fonts");
        Self::from_bytes(std::fs::read(bold)?, std::fs::read(regular)?)
    }

    /// Resolves fonts from explicit paths, then the environment, then
    /// well-known system locations.
    pub fn discover(bold: Option<&Path>, regular: Option<&Path>) -> Result<Self> {
        let bold = bold
            .map(Path::to_path_buf)
            .or_else(|| env_non_empty(BOLD_FONT_ENV_VAR).map(PathBuf::from));
        let regular = regular
            .map(Path::to_path_buf)
            .or_else(|| env_non_empty(REGULAR_FONT_ENV_VAR).map(PathBuf::from));

        if bold.is_some() || regular.is_some() {
            return Self::from_paths(bold.as_deref(), regular.as_deref());
        }

        let bold = first_existing(BOLD_CANDIDATES);
        let regular = first_existing(REGULAR_CANDIDATES);
        if bold.is_none() && regular.is_none() {
            return Err(CanvasError::Font(format!(
                "no system font found; set {REGULAR_FONT_ENV_VAR} or pass --font"
            )));
        }
        Self::from_paths(bold, regular)
    }

    /// Face for a weight.
    pub fn face(&self, weight: Weight) -> &FontVec {
        match weight {
            Weight::Bold => &self.bold,
            Weight::Regular => &self.regular,
        }
    }
}

fn parse(data: Vec<u8>) -> Result<FontVec> {
    FontVec::try_from_vec(data).map_err(|e| CanvasError::Font(e.to_string()))
}

fn first_existing(candidates: &[&'static str]) -> Option<&'static Path> {
    candidates
        .iter()
        .map(|candidate| Path::new(*candidate))
        .find(|path| path.is_file())
}

/// DejaVu Sans faces bundled for tests, so compositing is checked on any host.
#[cfg(test)]
pub(crate) fn test_fonts() -> FontSet {
    FontSet::from_bytes(
        include_bytes!("../../tests/fixtures/fonts/DejaVuSans-Bold.ttf").to_vec(),
        include_bytes!("../../tests/fixtures/fonts/DejaVuSans.ttf").to_vec(),
    )
    .unwrap()
}
