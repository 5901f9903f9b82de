//! The glyph rasterization gateway.
//!
//! A [`Face`] is a loaded outline font at a fixed pixel size. The converter
//! only needs three things from it: the nominal glyph for a code point, an
//! 8-bit coverage bitmap for that glyph and the face's vertical metrics. All
//! lengths returned through this interface other than bitmap dimensions and
//! placement are 26.6 fixed point, matching what FreeType reports.

#[cfg(feature = "skrifa")]
mod skrifa;

#[cfg(feature = "skrifa")]
pub use self::skrifa::SkrifaFace;

/// A 26.6 fixed point value: 1/64th of a pixel.
pub type Fixed26Dot6 = i32;

/// An 8-bit coverage bitmap.
///
/// Rows are `pitch` bytes apart in `data`; only the first `width` samples of
/// each row are meaningful.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub pitch: usize,
    pub data: Vec<u8>,
}

impl GlyphBitmap {
    /// Create a bitmap with rows stored back to back.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pitch: width as usize,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The samples of row `y`, without pitch padding.
    ///
    /// Rows missing from a short buffer read as empty.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.pitch;
        let end = start + self.width as usize;
        self.data.get(start..end).unwrap_or_default()
    }

    /// All samples in row-major order with the pitch padding removed.
    ///
    /// The result always holds `width * height` samples.
    pub fn samples(&self) -> Vec<u8> {
        let mut samples = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            let row = self.row(y);
            samples.extend_from_slice(row);
            samples.resize(samples.len() + (self.width as usize - row.len()), 0);
        }
        samples
    }
}

/// A rendered glyph and the placement metrics that go with it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RasterizedGlyph {
    pub bitmap: GlyphBitmap,
    /// Horizontal advance.
    pub advance: Fixed26Dot6,
    /// Distance in pixels from the pen position to the left edge of the
    /// bitmap.
    pub bitmap_left: i32,
    /// Distance in pixels from the baseline up to the top row of the bitmap.
    pub bitmap_top: i32,
}

/// Scaled vertical metrics of a face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceMetrics {
    /// Baseline to baseline distance.
    pub line_height: Fixed26Dot6,
    pub ascender: Fixed26Dot6,
    /// Usually negative.
    pub descender: Fixed26Dot6,
}

/// A font face that can map and rasterize glyphs.
///
/// Implementations treat every failure for a glyph as that glyph being
/// absent; there is no error channel.
pub trait Face {
    /// Set the size, in pixels per em, used by subsequent calls.
    fn set_pixel_size(&mut self, size_px: u32);

    /// Returns the nominal glyph index for a code point, or 0 if the face
    /// does not map it.
    fn glyph_index(&self, code_point: u32) -> u32;

    /// Render a glyph at the current size.
    fn rasterize(&mut self, glyph_index: u32) -> Option<RasterizedGlyph>;

    /// Vertical metrics at the current size.
    fn metrics(&self) -> FaceMetrics;
}

impl<F: Face + ?Sized> Face for Box<F> {
    fn set_pixel_size(&mut self, size_px: u32) {
        (**self).set_pixel_size(size_px)
    }

    fn glyph_index(&self, code_point: u32) -> u32 {
        (**self).glyph_index(code_point)
    }

    fn rasterize(&mut self, glyph_index: u32) -> Option<RasterizedGlyph> {
        (**self).rasterize(glyph_index)
    }

    fn metrics(&self) -> FaceMetrics {
        (**self).metrics()
    }
}
