//! A face backed by skrifa outlines and the zeno rasterizer.

use skrifa::{
    charmap::Charmap,
    outline::{DrawSettings, OutlinePen},
    prelude::{LocationRef, Size},
    raw::FontRef,
    GlyphId, MetadataProvider, OutlineGlyphCollection,
};
use zeno::{Command, Mask, Origin, Point};

use super::{Face, FaceMetrics, Fixed26Dot6, GlyphBitmap, RasterizedGlyph};
use crate::error::FontLoadError;

/// An outline font rasterized with antialiasing at an integral pixel size.
///
/// Outlines are drawn unhinted; advances and vertical metrics are rounded to
/// whole pixels the way FreeType reports them for a scalable face.
pub struct SkrifaFace<'a> {
    font: FontRef<'a>,
    charmap: Charmap<'a>,
    outlines: OutlineGlyphCollection<'a>,
    size: Size,
    commands: Vec<Command>,
}

impl<'a> SkrifaFace<'a> {
    /// Load the first face in `data`.
    ///
    /// `stack_index` is only used to identify the font in errors.
    pub fn new(data: &'a [u8], stack_index: usize) -> Result<Self, FontLoadError> {
        let font = FontRef::from_index(data, 0).map_err(|source| FontLoadError::Parse {
            index: stack_index,
            source,
        })?;
        let outlines = font.outline_glyphs();
        if outlines.format().is_none() {
            return Err(FontLoadError::NoOutlines { index: stack_index });
        }
        Ok(Self {
            charmap: font.charmap(),
            font,
            outlines,
            size: Size::unscaled(),
            commands: Vec::new(),
        })
    }

    pub fn font(&self) -> &FontRef<'a> {
        &self.font
    }
}

impl std::fmt::Debug for SkrifaFace<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkrifaFace")
            .field("size", &self.size.ppem())
            .field("format", &self.outlines.format())
            .finish_non_exhaustive()
    }
}

impl Face for SkrifaFace<'_> {
    fn set_pixel_size(&mut self, size_px: u32) {
        self.size = Size::new(size_px as f32);
    }

    fn glyph_index(&self, code_point: u32) -> u32 {
        self.charmap
            .map(code_point)
            .map(|gid| gid.to_u32())
            .unwrap_or_default()
    }

    fn rasterize(&mut self, glyph_index: u32) -> Option<RasterizedGlyph> {
        let glyph_id = GlyphId::new(glyph_index);
        let outline = self.outlines.get(glyph_id)?;
        self.commands.clear();
        let mut pen = ZenoPen(&mut self.commands);
        let draw = outline.draw(
            DrawSettings::unhinted(self.size, LocationRef::default()),
            &mut pen,
        );
        if let Err(e) = draw {
            log::debug!("glyph {glyph_index} failed to draw: {e}");
            return None;
        }
        let advance = self
            .font
            .glyph_metrics(self.size, LocationRef::default())
            .advance_width(glyph_id)
            .unwrap_or_default();
        let advance = to_26dot6(advance.round());
        if self.commands.is_empty() {
            return Some(RasterizedGlyph {
                advance,
                ..Default::default()
            });
        }
        let (data, placement) = Mask::new(self.commands.as_slice())
            .origin(Origin::BottomLeft)
            .render();
        // without an explicit mask size zeno reports the bottom edge as `top`
        let bitmap_top = placement.top + placement.height as i32;
        Some(RasterizedGlyph {
            bitmap: GlyphBitmap::new(placement.width, placement.height, data),
            advance,
            bitmap_left: placement.left,
            bitmap_top,
        })
    }

    fn metrics(&self) -> FaceMetrics {
        let metrics = self.font.metrics(self.size, LocationRef::default());
        FaceMetrics {
            line_height: to_26dot6((metrics.ascent - metrics.descent + metrics.leading).round()),
            ascender: to_26dot6(metrics.ascent.ceil()),
            descender: to_26dot6(metrics.descent.floor()),
        }
    }
}

fn to_26dot6(value: f32) -> Fixed26Dot6 {
    (value * 64.0) as Fixed26Dot6
}

/// Collects an outline as zeno path commands.
struct ZenoPen<'a>(&'a mut Vec<Command>);

impl OutlinePen for ZenoPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.push(Command::MoveTo(Point::new(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.push(Command::LineTo(Point::new(x, y)));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.0
            .push(Command::QuadTo(Point::new(cx0, cy0), Point::new(x, y)));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.push(Command::CurveTo(
            Point::new(cx0, cy0),
            Point::new(cx1, cy1),
            Point::new(x, y),
        ));
    }

    fn close(&mut self) {
        self.0.push(Command::Close);
    }
}
