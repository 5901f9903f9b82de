//! Unicode code point ranges.

use crate::error::ConvertError;

/// An inclusive range of unicode code points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodepointRange {
    pub start: u32,
    pub end: u32,
}

impl CodepointRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of code points in the range.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    pub fn contains(&self, code_point: u32) -> bool {
        (self.start..=self.end).contains(&code_point)
    }

    pub fn iter(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl From<std::ops::RangeInclusive<u32>> for CodepointRange {
    fn from(range: std::ops::RangeInclusive<u32>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}

/// A range of renderable code points together with the index of its first
/// glyph in the flattened glyph table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValidatedInterval {
    pub range: CodepointRange,
    pub glyph_index_offset: u32,
}

impl ValidatedInterval {
    pub fn start(&self) -> u32 {
        self.range.start
    }

    pub fn end(&self) -> u32 {
        self.range.end
    }

    /// Index in the glyph table of the glyph for `code_point`, if this
    /// interval covers it.
    pub fn glyph_index(&self, code_point: u32) -> Option<u32> {
        self.range
            .contains(code_point)
            .then(|| self.glyph_index_offset + (code_point - self.range.start))
    }
}

/// Assign cumulative glyph table offsets to a sequence of ranges.
pub fn assign_glyph_offsets(ranges: &[CodepointRange]) -> Vec<ValidatedInterval> {
    let mut offset = 0u32;
    ranges
        .iter()
        .map(|range| {
            let interval = ValidatedInterval {
                range: *range,
                glyph_index_offset: offset,
            };
            offset += range.len();
            interval
        })
        .collect()
}

/// The candidate ranges converted when no others are requested.
///
/// Latin, Greek, Cyrillic, Hangul, kana and CJK ideographs (including the
/// supplementary-plane extensions), general punctuation, symbols and emoji.
pub static DEFAULT_RANGES: &[CodepointRange] = &[
    // Basic Latin
    CodepointRange::new(0x0000, 0x007F),
    // Latin-1 Supplement
    CodepointRange::new(0x0080, 0x00FF),
    // Latin Extended-A
    CodepointRange::new(0x0100, 0x017F),
    // Latin Extended-B
    CodepointRange::new(0x0180, 0x024F),
    // IPA Extensions
    CodepointRange::new(0x0250, 0x02AF),
    // Spacing Modifier Letters
    CodepointRange::new(0x02B0, 0x02FF),
    // Combining Diacritical Marks
    CodepointRange::new(0x0300, 0x036F),
    // Greek and Coptic
    CodepointRange::new(0x0370, 0x03FF),
    // Cyrillic
    CodepointRange::new(0x0400, 0x04FF),
    // Cyrillic Supplement
    CodepointRange::new(0x0500, 0x052F),
    // Hangul Jamo
    CodepointRange::new(0x1100, 0x11FF),
    // Hangul Compatibility Jamo
    CodepointRange::new(0x3130, 0x318F),
    // Hangul Jamo Extended-A
    CodepointRange::new(0xA960, 0xA97F),
    // Hangul Syllables
    CodepointRange::new(0xAC00, 0xD7AF),
    // Hangul Jamo Extended-B
    CodepointRange::new(0xD7B0, 0xD7FF),
    // CJK Symbols and Punctuation
    CodepointRange::new(0x3000, 0x303F),
    // Hiragana
    CodepointRange::new(0x3040, 0x309F),
    // Katakana
    CodepointRange::new(0x30A0, 0x30FF),
    // Bopomofo
    CodepointRange::new(0x3100, 0x312F),
    // Katakana Phonetic Extensions
    CodepointRange::new(0x31F0, 0x31FF),
    // Enclosed CJK Letters and Months
    CodepointRange::new(0x3200, 0x32FF),
    // CJK Compatibility
    CodepointRange::new(0x3300, 0x33FF),
    // CJK Unified Ideographs Extension A
    CodepointRange::new(0x3400, 0x4DBF),
    // CJK Unified Ideographs
    CodepointRange::new(0x4E00, 0x9FFF),
    // CJK Compatibility Ideographs
    CodepointRange::new(0xF900, 0xFAFF),
    // Halfwidth and Fullwidth Forms
    CodepointRange::new(0xFF00, 0xFFEF),
    // General Punctuation
    CodepointRange::new(0x2000, 0x206F),
    // Superscripts and Subscripts
    CodepointRange::new(0x2070, 0x209F),
    // Currency Symbols
    CodepointRange::new(0x20A0, 0x20CF),
    // Combining Diacritical Marks for Symbols
    CodepointRange::new(0x20D0, 0x20FF),
    // Letterlike Symbols
    CodepointRange::new(0x2100, 0x214F),
    // Number Forms
    CodepointRange::new(0x2150, 0x218F),
    // Arrows
    CodepointRange::new(0x2190, 0x21FF),
    // Mathematical Operators
    CodepointRange::new(0x2200, 0x22FF),
    // Miscellaneous Technical
    CodepointRange::new(0x2300, 0x23FF),
    // Control Pictures
    CodepointRange::new(0x2400, 0x243F),
    // Optical Character Recognition
    CodepointRange::new(0x2440, 0x245F),
    // Enclosed Alphanumerics
    CodepointRange::new(0x2460, 0x24FF),
    // Box Drawing
    CodepointRange::new(0x2500, 0x257F),
    // Block Elements
    CodepointRange::new(0x2580, 0x259F),
    // Geometric Shapes
    CodepointRange::new(0x25A0, 0x25FF),
    // Miscellaneous Symbols
    CodepointRange::new(0x2600, 0x26FF),
    // Dingbats
    CodepointRange::new(0x2700, 0x27BF),
    // Miscellaneous Mathematical Symbols-A
    CodepointRange::new(0x27C0, 0x27EF),
    // Supplemental Arrows-A
    CodepointRange::new(0x27F0, 0x27FF),
    // Braille Patterns
    CodepointRange::new(0x2800, 0x28FF),
    // Supplemental Arrows-B
    CodepointRange::new(0x2900, 0x297F),
    // Miscellaneous Mathematical Symbols-B
    CodepointRange::new(0x2980, 0x29FF),
    // Supplemental Mathematical Operators
    CodepointRange::new(0x2A00, 0x2AFF),
    // Miscellaneous Symbols and Arrows
    CodepointRange::new(0x2B00, 0x2BFF),
    // Specials
    CodepointRange::new(0xFFF0, 0xFFFF),
    // Miscellaneous Symbols and Pictographs
    CodepointRange::new(0x1F300, 0x1F5FF),
    // Emoticons
    CodepointRange::new(0x1F600, 0x1F64F),
    // Transport and Map Symbols
    CodepointRange::new(0x1F680, 0x1F6FF),
    // Supplemental Symbols and Pictographs
    CodepointRange::new(0x1F900, 0x1F9FF),
    // Chess Symbols
    CodepointRange::new(0x1FA00, 0x1FA6F),
    // Symbols and Pictographs Extended-A
    CodepointRange::new(0x1FA70, 0x1FAFF),
    // CJK Unified Ideographs Extension B
    CodepointRange::new(0x20000, 0x2A6DF),
    // CJK Unified Ideographs Extension C
    CodepointRange::new(0x2A700, 0x2B73F),
    // CJK Unified Ideographs Extension D
    CodepointRange::new(0x2B740, 0x2B81F),
    // CJK Unified Ideographs Extension E
    CodepointRange::new(0x2B820, 0x2CEAF),
    // CJK Unified Ideographs Extension F
    CodepointRange::new(0x2CEB0, 0x2EBEF),
    // CJK Compatibility Ideographs Supplement
    CodepointRange::new(0x2F800, 0x2FA1F),
    // CJK Unified Ideographs Extension G
    CodepointRange::new(0x30000, 0x3134F),
];

/// Parse a comma or whitespace separated list of hex code points or ranges,
/// optionally prefixed with `U+`, e.g. `U+0041-005A,61-7a`.
pub fn parse_unicodes(input: &str) -> Result<Vec<CodepointRange>, ConvertError> {
    let mut ranges = Vec::new();
    for item in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
    {
        let (start, end) = match item.split_once('-') {
            Some((start, end)) => (parse_code_point(start)?, parse_code_point(end)?),
            None => {
                let cp = parse_code_point(item)?;
                (cp, cp)
            }
        };
        if start > end {
            return Err(ConvertError::InvalidRange { start, end });
        }
        ranges.push(CodepointRange::new(start, end));
    }
    Ok(ranges)
}

fn parse_code_point(s: &str) -> Result<u32, ConvertError> {
    let hex = s
        .strip_prefix("U+")
        .or_else(|| s.strip_prefix("u+"))
        .or_else(|| s.strip_prefix('U'))
        .or_else(|| s.strip_prefix('u'))
        .unwrap_or(s);
    let code_point = u32::from_str_radix(hex, 16)
        .map_err(|_| ConvertError::InvalidOptions(format!("invalid code point '{s}'")))?;
    if code_point > char::MAX as u32 {
        return Err(ConvertError::InvalidOptions(format!(
            "code point '{s}' is outside the unicode range"
        )));
    }
    Ok(code_point)
}
