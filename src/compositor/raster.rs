//! Paints an [`OverlayLayout`] onto pixels.

use crate::compositor::font::FontSet;
use crate::compositor::layout::{Gradient, OverlayLayout, Shadow, TextLine};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use imageproc::filter::gaussian_blur_f32;

/// Paints the gradient, shadows and text, in that order.
pub fn render(canvas: &mut RgbaImage, layout: &OverlayLayout, fonts: &FontSet) {
    if let Some(ref gradient) = layout.gradient {
        apply_gradient(canvas, gradient);
    }
    for line in &layout.lines {
        draw_line(canvas, line, fonts.face(line.weight));
    }
}

/// Darkens the top rows with a black gradient, source-over.
pub fn apply_gradient(canvas: &mut RgbaImage, gradient: &Gradient) {
    let rows = (gradient.extent.ceil() as u32).min(canvas.height());
    for y in 0..rows {
        let alpha = gradient.alpha_at(y);
        if alpha <= 0.0 {
            continue;
        }
        for x in 0..canvas.width() {
            let pixel = canvas.get_pixel_mut(x, y);
            *pixel = blend(*pixel, Rgba([0, 0, 0, 255]), alpha);
        }
    }
}

/// Source-over of `color` at `alpha` onto `dst`.
fn blend(dst: Rgba<u8>, color: Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let src_a = alpha.clamp(0.0, 1.0) * (color[3] as f32 / 255.0);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let value =
            (color[c] as f32 * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
        out[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    Rgba(out)
}

/// Advance width of `text`, kerning included.
pub fn measure_text_width(font: &FontVec, scale: PxScale, text: &str) -> f32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev = None;
    for c in text.chars() {
        let glyph_id = scaled.glyph_id(c);
        if let Some(prev_id) = prev {
            width += scaled.kern(prev_id, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev = Some(glyph_id);
    }
    width
}

/// Top-left origin that centres `line` on its baseline.
fn line_origin(font: &FontVec, line: &TextLine) -> (i32, i32) {
    let scale = PxScale::from(line.size);
    let width = measure_text_width(font, scale, &line.text);
    let ascent = font.as_scaled(scale).ascent();
    let x = (line.center_x - width / 2.0).round() as i32;
    let y = (line.baseline - ascent).round() as i32;
    (x, y)
}

fn draw_line(canvas: &mut RgbaImage, line: &TextLine, font: &FontVec) {
    let (x, y) = line_origin(font, line);
    let scale = PxScale::from(line.size);

    if let Some(ref shadow) = line.shadow {
        draw_shadow(canvas, shadow, x, y, scale, font, &line.text);
    }
    draw_text_mut(canvas, line.color, x, y, scale, font, &line.text);
}

/// Draws the text coverage into a mask, blurs it, and tints the canvas.
///
/// The mask covers the line box plus room for the blur tail and glyph
/// overhang, not the whole canvas.
fn draw_shadow(
    canvas: &mut RgbaImage,
    shadow: &Shadow,
    x: i32,
    y: i32,
    scale: PxScale,
    font: &FontVec,
    text: &str,
) {
    let sigma = shadow.blur / 2.0;
    let margin = (3.0 * sigma).ceil() as i32 + (scale.y / 4.0).ceil() as i32;
    let width = measure_text_width(font, scale, text).ceil() as i32 + 2 * margin;
    let height = font.as_scaled(scale).height().ceil() as i32 + 2 * margin;
    if width <= 0 || height <= 0 {
        return;
    }

    let mut mask = GrayImage::new(width as u32, height as u32);
    draw_text_mut(&mut mask, Luma([255u8]), margin, margin, scale, font, text);
    let mask = if sigma > 0.0 {
        gaussian_blur_f32(&mask, sigma)
    } else {
        mask
    };

    let (origin_x, origin_y) = (x - margin, y - margin);
    for (mx, my, coverage) in mask.enumerate_pixels() {
        if coverage[0] == 0 {
            continue;
        }
        let px = origin_x + mx as i32;
        let py = origin_y + my as i32;
        if px < 0 || py < 0 || px >= canvas.width() as i32 || py >= canvas.height() as i32 {
            continue;
        }
        let pixel = canvas.get_pixel_mut(px as u32, py as u32);
        *pixel = blend(*pixel, shadow.color, coverage[0] as f32 / 255.0);
    }
}
