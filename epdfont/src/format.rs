//! The EPDFONT binary format.
//!
//! All values are little-endian. A file is a fixed header followed by the
//! interval table, the glyph table and the bitmap blob, in that order and
//! without padding:
//!
//! ```text
//! header      32 bytes
//! intervals   12 bytes each: start, end, glyph index offset (u32)
//! glyphs      16 bytes each: width, height, advance, reserved (u8)
//!                            left, top (i16), data length, data offset (u32)
//! bitmaps     packed glyph data, offsets relative to the blob start
//! ```

use crate::{
    error::{ConvertError, ReadError},
    metrics::{FontMetrics, GlyphPlacement},
    pack::{self, BitDepth},
    ranges::{CodepointRange, ValidatedInterval},
};

/// "EPDF" read as a little-endian u32.
pub const MAGIC: u32 = 0x4644_5045;
pub const VERSION: u16 = 1;
pub const HEADER_LEN: usize = 32;
pub const INTERVAL_RECORD_LEN: usize = 12;
pub const GLYPH_RECORD_LEN: usize = 16;

/// A type that can be serialized into an EPDFONT buffer.
pub trait EpdWrite {
    fn write_into(&self, writer: &mut Writer);
}

/// Accumulates little-endian data.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// The fixed size file header.
///
/// The three font metrics are stored as their low byte only; read them back
/// with the signed accessors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub flags: u8,
    pub line_advance: u8,
    pub ascender: u8,
    pub descender: u8,
    pub interval_count: u32,
    pub glyph_count: u32,
    pub interval_table_offset: u32,
    pub glyph_table_offset: u32,
    pub bitmap_offset: u32,
}

impl Header {
    pub fn new(
        depth: BitDepth,
        metrics: &FontMetrics,
        interval_count: u32,
        glyph_count: u32,
    ) -> Self {
        let glyph_table_offset = HEADER_LEN as u32 + INTERVAL_RECORD_LEN as u32 * interval_count;
        Self {
            version: VERSION,
            flags: depth.flags(),
            line_advance: metrics.line_advance as u8,
            ascender: metrics.ascender as u8,
            descender: metrics.descender as u8,
            interval_count,
            glyph_count,
            interval_table_offset: HEADER_LEN as u32,
            glyph_table_offset,
            bitmap_offset: glyph_table_offset + GLYPH_RECORD_LEN as u32 * glyph_count,
        }
    }

    pub fn bit_depth(&self) -> BitDepth {
        BitDepth::from_flags(self.flags)
    }

    pub fn ascender(&self) -> i8 {
        self.ascender as i8
    }

    pub fn descender(&self) -> i8 {
        self.descender as i8
    }

    fn read(data: &[u8]) -> Result<Self, ReadError> {
        let data = Data(data);
        let magic = data.read_u32(0)?;
        if magic != MAGIC {
            return Err(ReadError::InvalidMagic(magic));
        }
        Ok(Self {
            version: data.read_u16(4)?,
            flags: data.read_u8(6)?,
            line_advance: data.read_u8(8)?,
            ascender: data.read_u8(9)?,
            descender: data.read_u8(10)?,
            interval_count: data.read_u32(12)?,
            glyph_count: data.read_u32(16)?,
            interval_table_offset: data.read_u32(20)?,
            glyph_table_offset: data.read_u32(24)?,
            bitmap_offset: data.read_u32(28)?,
        })
    }
}

impl EpdWrite for Header {
    fn write_into(&self, writer: &mut Writer) {
        writer.write_u32(MAGIC);
        writer.write_u16(self.version);
        writer.write_u8(self.flags);
        writer.write_u8(0);
        writer.write_u8(self.line_advance);
        writer.write_u8(self.ascender);
        writer.write_u8(self.descender);
        writer.write_u8(0);
        writer.write_u32(self.interval_count);
        writer.write_u32(self.glyph_count);
        writer.write_u32(self.interval_table_offset);
        writer.write_u32(self.glyph_table_offset);
        writer.write_u32(self.bitmap_offset);
    }
}

impl EpdWrite for ValidatedInterval {
    fn write_into(&self, writer: &mut Writer) {
        writer.write_u32(self.start());
        writer.write_u32(self.end());
        writer.write_u32(self.glyph_index_offset);
    }
}

/// Placement and bitmap location of one glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphRecord {
    pub width: u8,
    pub height: u8,
    /// Low byte of the horizontal advance in pixels.
    pub advance_x: u8,
    pub left: i16,
    pub top: i16,
    pub data_length: u32,
    /// Offset of the packed bitmap from the start of the bitmap blob.
    pub data_offset: u32,
}

impl GlyphRecord {
    fn read(data: &[u8]) -> Result<Self, ReadError> {
        let data = Data(data);
        Ok(Self {
            width: data.read_u8(0)?,
            height: data.read_u8(1)?,
            advance_x: data.read_u8(2)?,
            left: data.read_i16(4)?,
            top: data.read_i16(6)?,
            data_length: data.read_u32(8)?,
            data_offset: data.read_u32(12)?,
        })
    }
}

impl EpdWrite for GlyphRecord {
    fn write_into(&self, writer: &mut Writer) {
        writer.write_u8(self.width);
        writer.write_u8(self.height);
        writer.write_u8(self.advance_x);
        writer.write_u8(0);
        writer.write_i16(self.left);
        writer.write_i16(self.top);
        writer.write_u32(self.data_length);
        writer.write_u32(self.data_offset);
    }
}

/// An EPDFONT under construction.
///
/// Glyphs must be pushed in the order the intervals enumerate their code
/// points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EpdFont {
    pub bit_depth: BitDepth,
    pub metrics: FontMetrics,
    pub intervals: Vec<ValidatedInterval>,
    pub glyphs: Vec<GlyphRecord>,
    pub bitmap: Vec<u8>,
}

impl EpdFont {
    pub fn new(bit_depth: BitDepth, intervals: Vec<ValidatedInterval>) -> Self {
        Self {
            bit_depth,
            intervals,
            ..Default::default()
        }
    }

    /// Append the next glyph record and its packed data.
    pub fn push_glyph(
        &mut self,
        code_point: u32,
        width: u32,
        height: u32,
        placement: GlyphPlacement,
        packed: &[u8],
    ) -> Result<(), ConvertError> {
        let out_of_range = |field, value: i64| ConvertError::GlyphOutOfRange {
            code_point,
            field,
            value,
        };
        let record = GlyphRecord {
            width: u8::try_from(width).map_err(|_| out_of_range("width", width.into()))?,
            height: u8::try_from(height).map_err(|_| out_of_range("height", height.into()))?,
            advance_x: placement.advance_x as u8,
            left: i16::try_from(placement.left)
                .map_err(|_| out_of_range("left", placement.left.into()))?,
            top: i16::try_from(placement.top)
                .map_err(|_| out_of_range("top", placement.top.into()))?,
            data_length: packed.len() as u32,
            data_offset: self.bitmap.len() as u32,
        };
        self.glyphs.push(record);
        self.bitmap.extend_from_slice(packed);
        Ok(())
    }

    pub fn header(&self) -> Header {
        Header::new(
            self.bit_depth,
            &self.metrics,
            self.intervals.len() as u32,
            self.glyphs.len() as u32,
        )
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_LEN
            + INTERVAL_RECORD_LEN * self.intervals.len()
            + GLYPH_RECORD_LEN * self.glyphs.len()
            + self.bitmap.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::with_capacity(self.encoded_len());
        self.write_into(&mut writer);
        writer.into_inner()
    }
}

impl EpdWrite for EpdFont {
    fn write_into(&self, writer: &mut Writer) {
        self.header().write_into(writer);
        for interval in &self.intervals {
            interval.write_into(writer);
        }
        for glyph in &self.glyphs {
            glyph.write_into(writer);
        }
        writer.write_bytes(&self.bitmap);
    }
}

/// Bounds checked little-endian reads.
#[derive(Clone, Copy)]
struct Data<'a>(&'a [u8]);

impl Data<'_> {
    fn read<const N: usize>(&self, offset: usize) -> Result<[u8; N], ReadError> {
        self.0
            .get(offset..offset + N)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(ReadError::OutOfBounds)
    }

    fn read_u8(&self, offset: usize) -> Result<u8, ReadError> {
        self.read::<1>(offset).map(|[b]| b)
    }

    fn read_u16(&self, offset: usize) -> Result<u16, ReadError> {
        self.read(offset).map(u16::from_le_bytes)
    }

    fn read_i16(&self, offset: usize) -> Result<i16, ReadError> {
        self.read(offset).map(i16::from_le_bytes)
    }

    fn read_u32(&self, offset: usize) -> Result<u32, ReadError> {
        self.read(offset).map(u32::from_le_bytes)
    }
}

/// A parsed view of EPDFONT data.
#[derive(Clone, Copy, Debug)]
pub struct EpdFontRef<'a> {
    header: Header,
    intervals: &'a [u8],
    glyphs: &'a [u8],
    bitmap: &'a [u8],
}

impl<'a> EpdFontRef<'a> {
    /// Parse and validate the header and the interval table.
    ///
    /// Glyph records are only checked when they are accessed.
    pub fn read(data: &'a [u8]) -> Result<Self, ReadError> {
        let header = Header::read(data)?;
        if header.version != VERSION {
            return Err(ReadError::UnsupportedVersion(header.version));
        }
        let check_offset = |table, expected: u64, found: u32| {
            if expected == found as u64 {
                Ok(found as usize)
            } else {
                Err(ReadError::InvalidTableOffset {
                    table,
                    expected: expected.min(u32::MAX as u64) as u32,
                    found,
                })
            }
        };
        let interval_start = check_offset(
            "interval",
            HEADER_LEN as u64,
            header.interval_table_offset,
        )?;
        let glyph_start = check_offset(
            "glyph",
            interval_start as u64 + INTERVAL_RECORD_LEN as u64 * header.interval_count as u64,
            header.glyph_table_offset,
        )?;
        let bitmap_start = check_offset(
            "bitmap",
            glyph_start as u64 + GLYPH_RECORD_LEN as u64 * header.glyph_count as u64,
            header.bitmap_offset,
        )?;
        let font = Self {
            header,
            intervals: data
                .get(interval_start..glyph_start)
                .ok_or(ReadError::OutOfBounds)?,
            glyphs: data
                .get(glyph_start..bitmap_start)
                .ok_or(ReadError::OutOfBounds)?,
            bitmap: data.get(bitmap_start..).ok_or(ReadError::OutOfBounds)?,
        };
        font.validate_intervals()?;
        Ok(font)
    }

    fn validate_intervals(&self) -> Result<(), ReadError> {
        let mut expected_offset = 0u64;
        let mut prev_end: Option<u32> = None;
        for i in 0..self.header.interval_count as usize {
            let interval = self.interval(i)?;
            if interval.start() > interval.end() {
                return Err(ReadError::MalformedData("inverted interval"));
            }
            if prev_end.is_some_and(|end| interval.start() <= end) {
                return Err(ReadError::MalformedData("intervals out of order"));
            }
            if interval.glyph_index_offset as u64 != expected_offset {
                return Err(ReadError::MalformedData("bad glyph index offset"));
            }
            expected_offset += interval.range.len() as u64;
            prev_end = Some(interval.end());
        }
        if expected_offset != self.header.glyph_count as u64 {
            return Err(ReadError::MalformedData("glyph count mismatch"));
        }
        Ok(())
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.header.bit_depth()
    }

    pub fn interval(&self, index: usize) -> Result<ValidatedInterval, ReadError> {
        let data = Data(self.intervals);
        let base = index * INTERVAL_RECORD_LEN;
        Ok(ValidatedInterval {
            range: CodepointRange::new(data.read_u32(base)?, data.read_u32(base + 4)?),
            glyph_index_offset: data.read_u32(base + 8)?,
        })
    }

    pub fn intervals(&self) -> impl Iterator<Item = ValidatedInterval> + 'a {
        let data = self.intervals;
        data.chunks_exact(INTERVAL_RECORD_LEN).filter_map(|chunk| {
            let chunk = Data(chunk);
            Some(ValidatedInterval {
                range: CodepointRange::new(chunk.read_u32(0).ok()?, chunk.read_u32(4).ok()?),
                glyph_index_offset: chunk.read_u32(8).ok()?,
            })
        })
    }

    pub fn glyph_count(&self) -> u32 {
        self.header.glyph_count
    }

    pub fn glyph_record(&self, glyph_id: u32) -> Result<GlyphRecord, ReadError> {
        let start = glyph_id as usize * GLYPH_RECORD_LEN;
        self.glyphs
            .get(start..start + GLYPH_RECORD_LEN)
            .ok_or(ReadError::OutOfBounds)
            .and_then(GlyphRecord::read)
    }

    pub fn glyphs(&self) -> impl Iterator<Item = Result<GlyphRecord, ReadError>> + 'a {
        self.glyphs
            .chunks_exact(GLYPH_RECORD_LEN)
            .map(GlyphRecord::read)
    }

    /// Index of the glyph record for `code_point`, if the font has one.
    pub fn glyph_id(&self, code_point: u32) -> Option<u32> {
        let count = self.header.interval_count as usize;
        let (mut lo, mut hi) = (0, count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let interval = self.interval(mid).ok()?;
            if code_point < interval.start() {
                hi = mid;
            } else if code_point > interval.end() {
                lo = mid + 1;
            } else {
                return interval.glyph_index(code_point);
            }
        }
        None
    }

    pub fn glyph(&self, code_point: u32) -> Option<GlyphRecord> {
        self.glyph_record(self.glyph_id(code_point)?).ok()
    }

    /// The packed bitmap of a glyph.
    pub fn bitmap(&self, record: &GlyphRecord) -> Result<&'a [u8], ReadError> {
        let start = record.data_offset as usize;
        let bitmap: &'a [u8] = self.bitmap;
        bitmap
            .get(start..start.saturating_add(record.data_length as usize))
            .ok_or(ReadError::OutOfBounds)
    }

    /// Expand a glyph to one gray level per pixel, row by row.
    pub fn unpack(&self, record: &GlyphRecord) -> Result<Vec<u8>, ReadError> {
        let data = self.bitmap(record)?;
        let (width, height) = (record.width as u32, record.height as u32);
        if data.len() < pack::packed_len(width, height, self.bit_depth()) {
            return Err(ReadError::MalformedData("glyph data too short"));
        }
        Ok(pack::unpack(data, width, height, self.bit_depth()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::assign_glyph_offsets;
    use pretty_assertions::assert_eq;

    fn sample_font() -> EpdFont {
        let intervals =
            assign_glyph_offsets(&[CodepointRange::new(0x41, 0x42), CodepointRange::new(0x61, 0x61)]);
        let mut font = EpdFont::new(BitDepth::Two, intervals);
        font.metrics = FontMetrics {
            line_advance: 14,
            ascender: 10,
            descender: -3,
        };
        let placement = GlyphPlacement {
            advance_x: 5,
            left: 0,
            top: 7,
        };
        font.push_glyph(0x41, 2, 2, placement, &[0b11_10_01_00]).unwrap();
        font.push_glyph(0x42, 0, 0, placement, &[]).unwrap();
        font.push_glyph(0x61, 3, 2, placement, &[0xFF, 0x30]).unwrap();
        font
    }

    #[test]
    fn header_layout() {
        let bytes = sample_font().to_bytes();
        assert_eq!(&bytes[..4], b"EPDF");
        assert_eq!(&bytes[4..8], &[1, 0, 1, 0]);
        assert_eq!(&bytes[8..12], &[14, 10, 0xFD, 0]);
        assert_eq!(u32::from_le_bytes(bytes[12..16].try_into().unwrap()), 2);
        assert_eq!(u32::from_le_bytes(bytes[16..20].try_into().unwrap()), 3);
        assert_eq!(u32::from_le_bytes(bytes[20..24].try_into().unwrap()), 32);
        assert_eq!(u32::from_le_bytes(bytes[24..28].try_into().unwrap()), 32 + 24);
        assert_eq!(u32::from_le_bytes(bytes[28..32].try_into().unwrap()), 56 + 48);
        assert_eq!(bytes.len(), 104 + 3);
    }

    #[test]
    fn data_offsets_are_cumulative() {
        let font = sample_font();
        let offsets: Vec<_> = font
            .glyphs
            .iter()
            .map(|g| (g.data_offset, g.data_length))
            .collect();
        assert_eq!(offsets, [(0, 1), (1, 0), (1, 2)]);
    }

    #[test]
    fn read_back() {
        let font = sample_font();
        let bytes = font.to_bytes();
        let read = EpdFontRef::read(&bytes).unwrap();
        assert_eq!(*read.header(), font.header());
        assert_eq!(read.header().descender(), -3);
        assert_eq!(read.intervals().collect::<Vec<_>>(), font.intervals);
        let glyphs: Vec<_> = read.glyphs().collect::<Result<_, _>>().unwrap();
        assert_eq!(glyphs, font.glyphs);

        assert_eq!(read.glyph_id(0x41), Some(0));
        assert_eq!(read.glyph_id(0x61), Some(2));
        assert_eq!(read.glyph_id(0x43), None);
        assert_eq!(read.glyph_id(0x20), None);
        let a = read.glyph(0x41).unwrap();
        assert_eq!(read.bitmap(&a).unwrap(), &[0b11_10_01_00]);
        assert_eq!(read.unpack(&a).unwrap(), [3, 2, 1, 0]);
        let b = read.glyph(0x42).unwrap();
        assert!(read.unpack(&b).unwrap().is_empty());
    }

    #[test]
    fn empty_font() {
        let font = EpdFont::new(BitDepth::One, Vec::new());
        let bytes = font.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN);
        let read = EpdFontRef::read(&bytes).unwrap();
        assert_eq!(read.glyph_count(), 0);
        assert_eq!(read.header().glyph_table_offset, 32);
        assert_eq!(read.header().bitmap_offset, 32);
        assert_eq!(read.glyph_id(0x41), None);
    }

    #[test]
    fn record_overflow() {
        let mut font = EpdFont::new(BitDepth::One, Vec::new());
        let placement = GlyphPlacement::default();
        let err = font.push_glyph(0x41, 256, 1, placement, &[]).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::GlyphOutOfRange {
                code_point: 0x41,
                field: "width",
                value: 256
            }
        ));
        let placement = GlyphPlacement {
            top: 40_000,
            ..Default::default()
        };
        assert!(font.push_glyph(0x41, 1, 1, placement, &[0]).is_err());
        assert!(font.glyphs.is_empty());

        // advance keeps only its low byte
        let placement = GlyphPlacement {
            advance_x: 0x1_05,
            ..Default::default()
        };
        font.push_glyph(0x41, 1, 1, placement, &[0]).unwrap();
        assert_eq!(font.glyphs[0].advance_x, 5);
    }

    #[test]
    fn bad_input() {
        let bytes = sample_font().to_bytes();
        assert_eq!(
            EpdFontRef::read(&bytes[..20]).unwrap_err(),
            ReadError::OutOfBounds
        );
        assert_eq!(
            EpdFontRef::read(&bytes[..60]).unwrap_err(),
            ReadError::OutOfBounds
        );

        let mut bad = bytes.clone();
        bad[0] = b'X';
        assert!(matches!(
            EpdFontRef::read(&bad),
            Err(ReadError::InvalidMagic(_))
        ));

        let mut bad = bytes.clone();
        bad[4] = 2;
        assert_eq!(
            EpdFontRef::read(&bad).unwrap_err(),
            ReadError::UnsupportedVersion(2)
        );

        let mut bad = bytes.clone();
        bad[24] += 1;
        assert!(matches!(
            EpdFontRef::read(&bad),
            Err(ReadError::InvalidTableOffset { table: "glyph", .. })
        ));

        // glyph count no longer matches the intervals
        let mut bad = bytes.clone();
        bad[16] = 2;
        bad[28] -= 16;
        assert_eq!(
            EpdFontRef::read(&bad).unwrap_err(),
            ReadError::MalformedData("glyph count mismatch")
        );
    }
}
