//! Rounding 26.6 metrics to pixels and applying user adjustments.

use crate::face::{FaceMetrics, Fixed26Dot6, RasterizedGlyph};

/// Round a 26.6 value down to whole pixels.
pub fn floor_px(value: Fixed26Dot6) -> i32 {
    value.div_euclid(64)
}

/// Round a 26.6 value up to whole pixels.
pub fn ceil_px(value: Fixed26Dot6) -> i32 {
    -value.saturating_neg().div_euclid(64)
}

/// User adjustments applied to every glyph and to the line height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Adjustments {
    pub line_height: f64,
    pub letter_spacing: i32,
    pub width_scale: f64,
    pub baseline_offset: i32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            line_height: 1.2,
            letter_spacing: 0,
            width_scale: 1.0,
            baseline_offset: 0,
        }
    }
}

/// Final placement of a glyph, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub advance_x: i32,
    pub left: i32,
    pub top: i32,
}

/// Pixel vertical metrics of a font.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontMetrics {
    pub line_advance: i32,
    pub ascender: i32,
    pub descender: i32,
}

impl Adjustments {
    pub fn place(&self, glyph: &RasterizedGlyph) -> GlyphPlacement {
        let advance = floor_px(glyph.advance) as f64 * self.width_scale;
        GlyphPlacement {
            advance_x: (advance as i32).saturating_add(self.letter_spacing),
            left: glyph.bitmap_left,
            top: glyph.bitmap_top.saturating_add(self.baseline_offset),
        }
    }

    pub fn font_metrics(&self, metrics: &FaceMetrics) -> FontMetrics {
        FontMetrics {
            line_advance: (ceil_px(metrics.line_height) as f64 * self.line_height) as i32,
            ascender: ceil_px(metrics.ascender),
            descender: floor_px(metrics.descender),
        }
    }
}
