//! Converting outline fonts into EPDFONT bitmap fonts for e-paper displays.
//!
//! An EPDFONT file holds pre-rendered glyphs at a single pixel size, packed
//! at one or two bits per pixel, together with a table of the unicode ranges
//! it covers. See the [`format`] module for the layout.
//!
//! A conversion takes an ordered stack of faces. Each code point is rendered
//! by the first face that maps it, and code points no face renders are left
//! out of the range table:
//!
//! ```no_run
//! # fn main() -> Result<(), epdfont::ConvertError> {
//! let primary = std::fs::read("NotoSans-Regular.ttf").unwrap();
//! let fallback = std::fs::read("NotoSansKR-Regular.ttf").unwrap();
//! let options = epdfont::ConvertOptions {
//!     pixel_size: 20,
//!     ..Default::default()
//! };
//! let result = epdfont::convert_fonts(&[primary.as_slice(), &fallback], &options, |_: u32, _: u32| {})?;
//! println!("{} glyphs", result.stats.glyph_count);
//! # Ok(())
//! # }
//! ```
//!
//! Rendering goes through the [`Face`] trait; with the default `skrifa`
//! feature [`SkrifaFace`] draws outlines with [skrifa] and rasterizes them
//! with [zeno].
//!
//! [skrifa]: https://docs.rs/skrifa
//! [zeno]: https://docs.rs/zeno

#![forbid(unsafe_code)]

mod convert;
mod error;
pub mod face;
pub mod format;
mod metrics;
pub mod pack;
pub mod ranges;
mod split;
mod stack;

#[cfg(feature = "skrifa")]
pub use convert::convert_fonts;
pub use convert::{
    convert, ConvertOptions, ConvertStats, Conversion, Progress, Stage, PROGRESS_INTERVAL,
};
pub use error::{ConvertError, FontLoadError, ReadError};
#[cfg(feature = "skrifa")]
pub use face::SkrifaFace;
pub use face::{Face, FaceMetrics, Fixed26Dot6, GlyphBitmap, RasterizedGlyph};
pub use format::{EpdFont, EpdFontRef, GlyphRecord, Header};
pub use metrics::{ceil_px, floor_px, Adjustments, FontMetrics, GlyphPlacement};
pub use pack::BitDepth;
pub use ranges::{CodepointRange, ValidatedInterval, DEFAULT_RANGES};
pub use split::{normalize, split_ranges};
pub use stack::FontStack;
