//! Synthetic fonts shared by the epdfont tests, benches and fuzzers.
//!
//! The fonts are compiled on demand with write-fonts. Every glyph is made of
//! axis aligned rectangles so that rasterized coverage is easy to reason
//! about: at a given pixel size the mask is fully opaque inside the boxes and
//! only partially covered along edges that do not fall on pixel boundaries.

use kurbo::{BezPath, Rect, Shape};
use write_fonts::{
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
    },
    types::{FWord, GlyphId, UfWord},
    FontBuilder,
};

/// Units per em of every font in this crate.
pub const UPEM: u16 = 1000;

/// Hhea ascender of the fonts built with [`TestFont::new`].
pub const ASCENDER: i16 = 800;

/// Hhea descender of the fonts built with [`TestFont::new`].
pub const DESCENDER: i16 = -200;

/// A glyph in a synthetic font.
#[derive(Clone, Debug)]
pub struct TestGlyph {
    /// The character mapped to this glyph.
    pub ch: char,
    /// Advance width in font units.
    pub advance: u16,
    /// The boxes drawn for this glyph (x0, y0, x1, y1) in font units. Empty
    /// for a glyph like space.
    pub rects: Vec<(f64, f64, f64, f64)>,
}

impl TestGlyph {
    /// A glyph drawn as a single rectangle.
    pub fn rect(ch: char, advance: u16, bounds: (f64, f64, f64, f64)) -> Self {
        Self::rects(ch, advance, [bounds])
    }

    /// A glyph drawn as one contour per rectangle.
    pub fn rects(
        ch: char,
        advance: u16,
        rects: impl IntoIterator<Item = (f64, f64, f64, f64)>,
    ) -> Self {
        Self {
            ch,
            advance,
            rects: rects.into_iter().collect(),
        }
    }

    /// The rectangles as a TrueType outline, one contour each.
    pub fn outline(&self) -> Option<SimpleGlyph> {
        if self.rects.is_empty() {
            return None;
        }
        let mut path = BezPath::new();
        for (x0, y0, x1, y1) in &self.rects {
            path.extend(Rect::new(*x0, *y0, *x1, *y1).path_elements(0.1));
        }
        Some(SimpleGlyph::from_bezpath(&path).unwrap())
    }

    /// A glyph with an advance but no outline.
    pub fn empty(ch: char, advance: u16) -> Self {
        Self {
            ch,
            advance,
            rects: Vec::new(),
        }
    }
}

/// Builder for a minimal TrueType font.
#[derive(Clone, Debug)]
pub struct TestFont {
    ascender: i16,
    descender: i16,
    line_gap: i16,
    glyphs: Vec<TestGlyph>,
}

impl TestFont {
    pub fn new() -> Self {
        Self {
            ascender: ASCENDER,
            descender: DESCENDER,
            line_gap: 0,
            glyphs: Vec::new(),
        }
    }

    pub fn line_gap(mut self, line_gap: i16) -> Self {
        self.line_gap = line_gap;
        self
    }

    pub fn glyph(mut self, glyph: TestGlyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    pub fn glyphs(mut self, glyphs: impl IntoIterator<Item = TestGlyph>) -> Self {
        self.glyphs.extend(glyphs);
        self
    }

    /// Compile the font. Glyph 0 is an empty .notdef.
    pub fn build(&self) -> Vec<u8> {
        let mut glyf_builder = GlyfLocaBuilder::new();
        glyf_builder.add_glyph(&Glyph::Empty).unwrap();
        let mut h_metrics = vec![LongMetric {
            advance: UPEM / 2,
            side_bearing: 0,
        }];
        let mut mappings = Vec::new();
        for (i, glyph) in self.glyphs.iter().enumerate() {
            let gid = GlyphId::new(i as u32 + 1);
            mappings.push((glyph.ch, gid));
            let side_bearing = match glyph.outline() {
                Some(simple) => {
                    glyf_builder.add_glyph(&simple).unwrap();
                    simple.bbox.x_min
                }
                None => {
                    glyf_builder.add_glyph(&Glyph::Empty).unwrap();
                    0
                }
            };
            h_metrics.push(LongMetric {
                advance: glyph.advance,
                side_bearing,
            });
        }
        let (glyf, loca, loca_format) = glyf_builder.build();
        let num_glyphs = h_metrics.len() as u16;
        let advance_width_max = h_metrics.iter().map(|m| m.advance).max().unwrap_or(0);

        let head = Head {
            units_per_em: UPEM,
            index_to_loc_format: match loca_format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            },
            ..Default::default()
        };
        let hhea = Hhea {
            ascender: FWord::new(self.ascender),
            descender: FWord::new(self.descender),
            line_gap: FWord::new(self.line_gap),
            advance_width_max: UfWord::new(advance_width_max),
            number_of_h_metrics: num_glyphs,
            ..Default::default()
        };
        let maxp = Maxp {
            num_glyphs,
            ..Default::default()
        };
        let hmtx = Hmtx::new(h_metrics, Vec::new());
        let cmap = Cmap::from_mappings(mappings).unwrap();

        FontBuilder::new()
            .add_table(&head)
            .unwrap()
            .add_table(&hhea)
            .unwrap()
            .add_table(&maxp)
            .unwrap()
            .add_table(&hmtx)
            .unwrap()
            .add_table(&cmap)
            .unwrap()
            .add_table(&glyf)
            .unwrap()
            .add_table(&loca)
            .unwrap()
            .build()
    }
}

impl Default for TestFont {
    fn default() -> Self {
        Self::new()
    }
}

/// A font mapping only the capital letters `A`-`Z`.
///
/// Each letter is a box 700 units tall whose width grows with its position in
/// the alphabet, so every glyph has a distinct bitmap size.
pub fn ascii_caps() -> Vec<u8> {
    TestFont::new().glyphs(caps_glyphs(0.0)).build()
}

/// A font mapping `A`-`M`, a space and the vertical bar, with a line gap.
///
/// The bar extends below the baseline; this font is meant as the primary
/// face of a fallback stack in front of [`ascii_caps`].
pub fn partial_caps_with_bar() -> Vec<u8> {
    TestFont::new()
        .line_gap(200)
        .glyphs(caps_glyphs(100.0).take(13))
        .glyph(TestGlyph::empty(' ', 250))
        .glyph(TestGlyph::rect('|', 300, (100.0, -200.0, 200.0, 800.0)))
        .build()
}

/// A font mapping the digits `0`-`9` except `3` and `7`.
pub fn digits_with_gaps() -> Vec<u8> {
    TestFont::new()
        .glyphs(
            ('0'..='9')
                .filter(|ch| *ch != '3' && *ch != '7')
                .map(|ch| TestGlyph::rect(ch, 600, (50.0, 0.0, 550.0, 700.0))),
        )
        .build()
}

/// A font with shapes whose rows differ: `T` is a 500 unit bar on a 100 unit
/// stem, 700 units tall, and `-` is a bar from 300 to 400 units.
pub fn shapes() -> Vec<u8> {
    TestFont::new()
        .glyph(TestGlyph::rects(
            'T',
            600,
            [(0.0, 600.0, 500.0, 700.0), (200.0, 0.0, 300.0, 600.0)],
        ))
        .glyph(TestGlyph::rect('-', 400, (0.0, 300.0, 300.0, 400.0)))
        .build()
}

fn caps_glyphs(x_offset: f64) -> impl Iterator<Item = TestGlyph> {
    ('A'..='Z').enumerate().map(move |(i, ch)| {
        let width = 300.0 + 25.0 * i as f64;
        let advance = (width + 100.0) as u16;
        TestGlyph::rect(ch, advance, (x_offset, 0.0, x_offset + width, 700.0))
    })
}
