//! Overlay geometry and colours, computed without touching pixels.

use crate::weather::WeatherState;
use image::Rgba;

/// Share of the canvas height covered by the dark-theme gradient.
pub const GRADIENT_COVERAGE: f32 = 0.4;
/// Gradient opacity at the top edge.
pub const GRADIENT_START_ALPHA: f32 = 0.6;

/// First baseline, as a share of canvas width.
pub const TEXT_START: f32 = 0.15;
/// City line size, as a share of canvas width.
pub const CITY_SIZE: f32 = 0.09;
/// Temperature line size, as a share of canvas width.
pub const TEMPERATURE_SIZE: f32 = 0.045;
/// Date line size, as a share of canvas width.
pub const DATE_SIZE: f32 = 0.025;
/// Temperature baseline offset below the city baseline.
pub const TEMPERATURE_OFFSET: f32 = 0.08;
/// Date baseline offset below the city baseline.
pub const DATE_OFFSET: f32 = 0.12;

/// Slate 900.
pub const LIGHT_PRIMARY: Rgba<u8> = Rgba([0x0f, 0x17, 0x2a, 0xff]);
/// Slate 500.
pub const LIGHT_SECONDARY: Rgba<u8> = Rgba([0x64, 0x74, 0x8b, 0xff]);
/// White.
pub const DARK_PRIMARY: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
/// Slate 300.
pub const DARK_SECONDARY: Rgba<u8> = Rgba([0xcb, 0xd5, 0xe1, 0xff]);

/// Shadow behind dark-theme text.
pub const DARK_SHADOW: Shadow = Shadow {
    color: Rgba([0, 0, 0, 179]),
    blur: 15.0,
};

/// Whether the generated image is pale (dark text) or dark (light text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Pale background, dark text, no gradient or shadow.
    Light,
    /// Dark background, white text over a gradient, with shadow.
    Dark,
}

/// Vertical black gradient from the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    /// Rows covered, from y = 0.
    pub extent: f32,
    /// Opacity at y = 0, fading linearly to 0 at `extent`.
    pub start_alpha: f32,
}

impl Gradient {
    /// Opacity over the centre of row `y`.
    pub fn alpha_at(&self, y: u32) -> f32 {
        let t = (y as f32 + 0.5) / self.extent;
        if t >= 1.0 {
            0.0
        } else {
            self.start_alpha * (1.0 - t)
        }
    }
}

/// Blurred drop shadow with no offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Shadow colour; alpha is the peak opacity.
    pub color: Rgba<u8>,
    /// Blur radius in pixels. The Gaussian sigma is half of it.
    pub blur: f32,
}

/// Font weight of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    /// Bold face.
    Bold,
    /// Regular face.
    Regular,
}

/// One horizontally centred line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Text to draw.
    pub text: String,
    /// Pixel size.
    pub size: f32,
    /// Horizontal centre.
    pub center_x: f32,
    /// Baseline y.
    pub baseline: f32,
    /// Face.
    pub weight: Weight,
    /// Fill colour.
    pub color: Rgba<u8>,
    /// Shadow, if any.
    pub shadow: Option<Shadow>,
}

/// Everything painted over the generated image.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Theme derived from the style.
    pub theme: Theme,
    /// Gradient, dark theme only.
    pub gradient: Option<Gradient>,
    /// City, temperature and date lines, top to bottom.
    pub lines: Vec<TextLine>,
}

impl OverlayLayout {
    /// Lays out the overlay for a canvas of the given size.
    pub fn for_state(state: &WeatherState, width: u32, height: u32) -> Self {
        let theme = if state.style.is_light() {
            Theme::Light
        } else {
            Theme::Dark
        };
        let (primary, secondary, shadow) = match theme {
            Theme::Light => (LIGHT_PRIMARY, LIGHT_SECONDARY, None),
            Theme::Dark => (DARK_PRIMARY, DARK_SECONDARY, Some(DARK_SHADOW)),
        };
        let gradient = (theme == Theme::Dark).then(|| Gradient {
            extent: height as f32 * GRADIENT_COVERAGE,
            start_alpha: GRADIENT_START_ALPHA,
        });

        let w = width as f32;
        let center_x = w / 2.0;
        let start = w * TEXT_START;

        let lines = vec![
            TextLine {
                text: format!("[ {} ]", state.display_city().to_uppercase()),
                size: w * CITY_SIZE,
                center_x,
                baseline: start,
                weight: Weight::Bold,
                color: primary,
                shadow,
            },
            TextLine {
                text: state.temperature_line(),
                size: w * TEMPERATURE_SIZE,
                center_x,
                baseline: start + w * TEMPERATURE_OFFSET,
                weight: Weight::Bold,
                color: primary,
                shadow,
            },
            TextLine {
                text: state.date.clone(),
                size: w * DATE_SIZE,
                center_x,
                baseline: start + w * DATE_OFFSET,
                weight: Weight::Regular,
                color: secondary,
                shadow: None,
            },
        ];

        Self {
            width,
            height,
            theme,
            gradient,
            lines,
        }
    }
}
