//! Running a conversion job from a font stack to EPDFONT bytes.

use std::ops::RangeInclusive;

use crate::{
    error::ConvertError,
    face::Face,
    format::EpdFont,
    metrics::{Adjustments, GlyphPlacement},
    pack::{self, BitDepth},
    ranges::{assign_glyph_offsets, CodepointRange, DEFAULT_RANGES},
    split::split_ranges,
    stack::FontStack,
};

/// Progress is reported after this many code points.
pub const PROGRESS_INTERVAL: u32 = 100;

/// Parameters of a conversion job.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertOptions {
    /// Pixels per em.
    pub pixel_size: u32,
    pub bit_depth: BitDepth,
    /// Multiplier applied to the face's line height.
    pub line_height: f64,
    /// Pixels added to every advance; may be negative.
    pub letter_spacing: i32,
    /// Multiplier applied to every advance before spacing.
    pub width_scale: f64,
    /// Pixels added to every glyph's top; may be negative.
    pub baseline_offset: i32,
    /// Candidate code points, in any order.
    pub ranges: Vec<CodepointRange>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        let adjust = Adjustments::default();
        Self {
            pixel_size: 28,
            bit_depth: BitDepth::One,
            line_height: adjust.line_height,
            letter_spacing: adjust.letter_spacing,
            width_scale: adjust.width_scale,
            baseline_offset: adjust.baseline_offset,
            ranges: DEFAULT_RANGES.to_vec(),
        }
    }
}

impl ConvertOptions {
    pub const PIXEL_SIZE: RangeInclusive<u32> = 8..=128;
    pub const LINE_HEIGHT: RangeInclusive<f64> = 0.5..=3.0;
    pub const LETTER_SPACING: RangeInclusive<i32> = -10..=10;
    pub const WIDTH_SCALE: RangeInclusive<f64> = 0.1..=2.0;
    pub const BASELINE_OFFSET: RangeInclusive<i32> = -20..=20;

    /// Check every parameter against its accepted range.
    pub fn validate(&self) -> Result<(), ConvertError> {
        check("pixel size", self.pixel_size, Self::PIXEL_SIZE)?;
        check("line height", self.line_height, Self::LINE_HEIGHT)?;
        check("letter spacing", self.letter_spacing, Self::LETTER_SPACING)?;
        check("width scale", self.width_scale, Self::WIDTH_SCALE)?;
        check("baseline offset", self.baseline_offset, Self::BASELINE_OFFSET)
    }

    pub fn adjustments(&self) -> Adjustments {
        Adjustments {
            line_height: self.line_height,
            letter_spacing: self.letter_spacing,
            width_scale: self.width_scale,
            baseline_offset: self.baseline_offset,
        }
    }
}

fn check<T: PartialOrd + std::fmt::Display>(
    name: &str,
    value: T,
    range: RangeInclusive<T>,
) -> Result<(), ConvertError> {
    // NaN is never contained
    if range.contains(&value) {
        return Ok(());
    }
    Err(ConvertError::InvalidOptions(format!(
        "{name} must be in {}..={}, found {value}",
        range.start(),
        range.end()
    )))
}

/// The steps of a conversion, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    FacesLoaded,
    IntervalsValidated,
    GlyphsGenerated,
    Encoded,
    Done,
}

/// Receives `(processed, total)` code point counts while glyphs are
/// generated.
pub trait Progress {
    fn progress(&mut self, processed: u32, total: u32);
}

impl<F: FnMut(u32, u32)> Progress for F {
    fn progress(&mut self, processed: u32, total: u32) {
        self(processed, total)
    }
}

/// Summary of a finished conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConvertStats {
    pub glyph_count: u32,
    pub interval_count: u32,
    pub line_advance: i32,
    pub ascender: i32,
    pub descender: i32,
    pub byte_size: usize,
}

/// The output of a conversion.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub bytes: Vec<u8>,
    pub stats: ConvertStats,
}

/// A glyph rendered while splitting, waiting for its record.
struct PendingGlyph {
    code_point: u32,
    width: u32,
    height: u32,
    placement: GlyphPlacement,
    packed: Vec<u8>,
}

struct Job {
    stage: Stage,
}

impl Job {
    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage);
        log::debug!("{:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

/// Convert the code points in `options.ranges` that some face in `stack`
/// can render.
///
/// Faces are sized in place. Code points that no face renders are left out
/// of the result; if none remain the output is a bare header.
pub fn convert<F: Face>(
    stack: &mut FontStack<F>,
    options: &ConvertOptions,
    mut progress: impl Progress,
) -> Result<Conversion, ConvertError> {
    let mut job = Job { stage: Stage::Init };
    options.validate()?;
    if stack.is_empty() {
        return Err(ConvertError::EmptyStack);
    }
    stack.set_pixel_size(options.pixel_size);
    job.advance(Stage::FacesLoaded);

    // the splitter visits candidates in order, so the glyphs it keeps line up
    // with the code points of the ranges it returns
    let adjust = options.adjustments();
    let mut rendered = Vec::new();
    let ranges = split_ranges(&options.ranges, |code_point| {
        let Some((_, glyph)) = stack.resolve(code_point) else {
            return false;
        };
        rendered.push(PendingGlyph {
            code_point,
            width: glyph.bitmap.width,
            height: glyph.bitmap.height,
            placement: adjust.place(&glyph),
            packed: pack::pack(&glyph.bitmap, options.bit_depth),
        });
        true
    })?;
    let intervals = assign_glyph_offsets(&ranges);
    let total: u32 = ranges.iter().map(CodepointRange::len).sum();
    debug_assert_eq!(total as usize, rendered.len());
    log::debug!("{} intervals, {total} glyphs", intervals.len());
    job.advance(Stage::IntervalsValidated);

    let mut font = EpdFont::new(options.bit_depth, intervals);
    let mut processed = 0u32;
    for glyph in rendered {
        let PendingGlyph {
            code_point,
            width,
            height,
            placement,
            packed,
        } = glyph;
        log::trace!("U+{code_point:04X}: {width}x{height} {placement:?}");
        font.push_glyph(code_point, width, height, placement, &packed)?;
        processed += 1;
        if processed % PROGRESS_INTERVAL == 0 {
            progress.progress(processed, total);
        }
    }
    progress.progress(processed, total);

    if let Some(face) = stack.reference_face() {
        font.metrics = adjust.font_metrics(&face.metrics());
    }
    job.advance(Stage::GlyphsGenerated);

    let bytes = font.to_bytes();
    job.advance(Stage::Encoded);

    let stats = ConvertStats {
        glyph_count: font.glyphs.len() as u32,
        interval_count: font.intervals.len() as u32,
        line_advance: font.metrics.line_advance,
        ascender: font.metrics.ascender,
        descender: font.metrics.descender,
        byte_size: bytes.len(),
    };
    log::info!(
        "converted {} glyphs in {} intervals, {} bytes",
        stats.glyph_count,
        stats.interval_count,
        stats.byte_size
    );
    job.advance(Stage::Done);
    Ok(Conversion { bytes, stats })
}

/// Load every font in `fonts` with the skrifa backend and convert them as
/// one stack, the first font taking priority.
#[cfg(feature = "skrifa")]
pub fn convert_fonts(
    fonts: &[&[u8]],
    options: &ConvertOptions,
    progress: impl Progress,
) -> Result<Conversion, ConvertError> {
    use crate::face::SkrifaFace;

    options.validate()?;
    let faces = fonts
        .iter()
        .enumerate()
        .map(|(i, data)| SkrifaFace::new(data, i))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("loaded {} faces", faces.len());
    convert(&mut FontStack::new(faces), options, progress)
}
