//! Packing 8-bit coverage into 1 or 2 bits per pixel.
//!
//! Packing happens in two steps. Coverage is first reduced to 4 bits per
//! pixel, two pixels per byte with each row padded to a whole byte. The
//! reduced samples are then requantized and packed MSB first with no row
//! alignment at all: bits run on from one row into the next and only the
//! final byte of a glyph is padded.

use crate::face::GlyphBitmap;

/// Number of bits stored for each pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BitDepth {
    /// Black and white.
    #[default]
    One,
    /// Four levels of gray.
    Two,
}

impl BitDepth {
    pub fn is_two_bit(self) -> bool {
        self == BitDepth::Two
    }

    pub fn bits_per_pixel(self) -> u32 {
        match self {
            BitDepth::One => 1,
            BitDepth::Two => 2,
        }
    }

    /// The value of the header flags byte.
    pub fn flags(self) -> u8 {
        self.is_two_bit() as u8
    }

    pub fn from_flags(flags: u8) -> Self {
        if flags & 1 == 1 {
            BitDepth::Two
        } else {
            BitDepth::One
        }
    }
}

/// Size in bytes of a packed `width` x `height` glyph.
pub fn packed_len(width: u32, height: u32, depth: BitDepth) -> usize {
    let bits = width as usize * height as usize * depth.bits_per_pixel() as usize;
    bits.div_ceil(8)
}

/// Reduce coverage to 4 bits per pixel.
///
/// The even column of each pair lands in the low nibble and the odd column
/// in the high nibble. Each row takes `ceil(width / 2)` bytes.
pub fn reduce_to_4bit(bitmap: &GlyphBitmap) -> Vec<u8> {
    let width = bitmap.width as usize;
    let pitch = width.div_ceil(2);
    let mut out = Vec::with_capacity(pitch * bitmap.height as usize);
    for y in 0..bitmap.height {
        let row = bitmap.row(y);
        let mut px = 0u8;
        for x in 0..width {
            let v = row.get(x).copied().unwrap_or_default();
            if x % 2 == 0 {
                px = v >> 4;
                if x == width - 1 {
                    out.push(px);
                }
            } else {
                out.push(px | (v & 0xF0));
            }
        }
    }
    out
}

/// Pack a glyph at the given depth.
///
/// The result is exactly [`packed_len`] bytes long.
pub fn pack(bitmap: &GlyphBitmap, depth: BitDepth) -> Vec<u8> {
    if bitmap.is_empty() {
        return Vec::new();
    }
    let reduced = reduce_to_4bit(bitmap);
    let width = bitmap.width as usize;
    let pitch = width.div_ceil(2);
    let pixels_per_byte = 8 / depth.bits_per_pixel() as usize;
    let pixel_count = width * bitmap.height as usize;

    let mut out = Vec::with_capacity(packed_len(bitmap.width, bitmap.height, depth));
    let mut px = 0u8;
    for y in 0..bitmap.height as usize {
        for x in 0..width {
            let bm = reduced.get(y * pitch + x / 2).copied().unwrap_or_default();
            px = match depth {
                BitDepth::One => {
                    let mask = if x % 2 == 0 { 0x0E } else { 0xE0 };
                    (px << 1) | (bm & mask != 0) as u8
                }
                BitDepth::Two => (px << 2) | quantize_2bit((bm >> ((x % 2) * 4)) & 0x0F),
            };
            if (y * width + x) % pixels_per_byte == pixels_per_byte - 1 {
                out.push(px);
                px = 0;
            }
        }
    }
    let rem = pixel_count % pixels_per_byte;
    if rem != 0 {
        let bits = depth.bits_per_pixel() as usize;
        out.push(px << ((pixels_per_byte - rem) * bits));
    }
    out
}

/// Map a 4-bit coverage value to one of four gray levels.
fn quantize_2bit(nibble: u8) -> u8 {
    match nibble {
        12.. => 3,
        8..=11 => 2,
        4..=7 => 1,
        _ => 0,
    }
}

/// Expand packed data back to one level per pixel, in row-major order.
///
/// Missing bytes read as zero.
pub fn unpack(data: &[u8], width: u32, height: u32, depth: BitDepth) -> Vec<u8> {
    let bits = depth.bits_per_pixel() as usize;
    let mask = (1u8 << bits) - 1;
    let pixels_per_byte = 8 / bits;
    (0..width as usize * height as usize)
        .map(|i| {
            let byte = data.get(i / pixels_per_byte).copied().unwrap_or_default();
            let shift = 8 - bits * (i % pixels_per_byte + 1);
            (byte >> shift) & mask
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bitmap(width: u32, height: u32, data: &[u8]) -> GlyphBitmap {
        GlyphBitmap::new(width, height, data.to_vec())
    }

    #[test]
    fn lengths() {
        for (w, h) in [(3, 3), (8, 1), (7, 5), (1, 1), (16, 20)] {
            let glyph = bitmap(w, h, &vec![0x80; (w * h) as usize]);
            assert_eq!(pack(&glyph, BitDepth::One).len(), packed_len(w, h, BitDepth::One));
            assert_eq!(pack(&glyph, BitDepth::Two).len(), packed_len(w, h, BitDepth::Two));
        }
        assert_eq!(packed_len(3, 3, BitDepth::One), 2);
        assert_eq!(packed_len(3, 3, BitDepth::Two), 3);
    }

    #[test]
    fn empty_glyph() {
        assert!(pack(&bitmap(0, 0, &[]), BitDepth::One).is_empty());
        assert!(pack(&bitmap(5, 0, &[]), BitDepth::Two).is_empty());
        assert!(reduce_to_4bit(&bitmap(0, 4, &[])).is_empty());
    }

    #[test]
    fn nibble_order_and_odd_width() {
        let glyph = bitmap(3, 2, &[0xFF, 0x10, 0xA0, 0x20, 0x30, 0x40]);
        assert_eq!(reduce_to_4bit(&glyph), [0x1F, 0x0A, 0x32, 0x04]);
    }

    #[test]
    fn two_bit_thresholds() {
        let glyph = bitmap(4, 1, &[0xC0, 0x80, 0x40, 0x3F]);
        assert_eq!(pack(&glyph, BitDepth::Two), [0b11_10_01_00]);
        let glyph = bitmap(4, 1, &[0xFF, 0xBF, 0x7F, 0x00]);
        assert_eq!(pack(&glyph, BitDepth::Two), [0b11_10_01_00]);
    }

    #[test]
    fn one_bit_threshold() {
        let glyph = bitmap(4, 1, &[0x1F, 0x20, 0x20, 0x1F]);
        assert_eq!(pack(&glyph, BitDepth::One), [0b0110_0000]);
    }

    #[test]
    fn bits_run_across_rows() {
        let glyph = bitmap(3, 2, &[0xFF; 6]);
        assert_eq!(pack(&glyph, BitDepth::One), [0b1111_1100]);
        assert_eq!(pack(&glyph, BitDepth::Two), [0xFF, 0xF0]);

        // a 3x3 checkerboard puts row 1 into the middle of the first byte
        let glyph = bitmap(3, 3, &[0xFF, 0, 0xFF, 0, 0xFF, 0, 0xFF, 0, 0xFF]);
        assert_eq!(pack(&glyph, BitDepth::One), [0b1010_1010, 0b1000_0000]);
    }

    #[test]
    fn pitched_rows() {
        let glyph = GlyphBitmap {
            width: 2,
            height: 2,
            pitch: 4,
            data: vec![0xFF, 0x00, 0xAA, 0xAA, 0x00, 0xFF, 0xAA, 0xAA],
        };
        assert_eq!(pack(&glyph, BitDepth::One), [0b1001_0000]);
    }

    #[test]
    fn unpack_levels() {
        let glyph = bitmap(3, 2, &[0xFF, 0x90, 0x50, 0x00, 0xC0, 0x10]);
        let packed = pack(&glyph, BitDepth::Two);
        assert_eq!(unpack(&packed, 3, 2, BitDepth::Two), [3, 2, 1, 0, 3, 0]);
        let packed = pack(&glyph, BitDepth::One);
        assert_eq!(unpack(&packed, 3, 2, BitDepth::One), [1, 1, 1, 0, 1, 0]);
    }

    #[test]
    fn flags() {
        assert_eq!(BitDepth::One.flags(), 0);
        assert_eq!(BitDepth::Two.flags(), 1);
        assert_eq!(BitDepth::from_flags(0x81), BitDepth::Two);
        assert_eq!(BitDepth::default(), BitDepth::One);
    }
}
