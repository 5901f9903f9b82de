//! Errors produced while converting fonts and reading EPDFONT data.

use thiserror::Error;

#[cfg(feature = "skrifa")]
use skrifa::raw::ReadError as FontReadError;

/// A font in the stack could not be used as an outline face.
#[derive(Debug, Clone, Error)]
pub enum FontLoadError {
    #[cfg(feature = "skrifa")]
    #[error("font {index} could not be parsed: {source}")]
    Parse {
        /// Position of the font in the stack.
        index: usize,
        source: FontReadError,
    },
    #[error("font {index} has no scalable outlines")]
    NoOutlines { index: usize },
}

/// An error that aborts a conversion job.
#[derive(Debug, Clone, Error)]
pub enum ConvertError {
    #[error(transparent)]
    FontLoad(#[from] FontLoadError),

    #[error("the font stack is empty")]
    EmptyStack,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid unicode range {start:04X}-{end:04X}")]
    InvalidRange { start: u32, end: u32 },

    #[error("glyph for U+{code_point:04X} does not fit a glyph record: {field} = {value}")]
    GlyphOutOfRange {
        code_point: u32,
        field: &'static str,
        value: i64,
    },
}

/// An error that occurs when reading EPDFONT data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("An offset was out of bounds")]
    OutOfBounds,
    #[error("Invalid magic 0x{0:08X}")]
    InvalidMagic(u32),
    #[error("Unsupported version {0}")]
    UnsupportedVersion(u16),
    #[error("the {table} table offset is {found}, expected {expected}")]
    InvalidTableOffset {
        table: &'static str,
        expected: u32,
        found: u32,
    },
    #[error("Malformed data: '{0}'")]
    MalformedData(&'static str),
}
