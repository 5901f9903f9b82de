//! End to end conversions of the synthetic test fonts.

use epdfont::{
    convert_fonts, pack::packed_len, BitDepth, CodepointRange, ConvertError, ConvertOptions,
    EpdFontRef, FontLoadError,
};
use pretty_assertions::assert_eq;

fn options(pixel_size: u32, ranges: &[(u32, u32)]) -> ConvertOptions {
    ConvertOptions {
        pixel_size,
        ranges: ranges
            .iter()
            .map(|(start, end)| CodepointRange::new(*start, *end))
            .collect(),
        ..Default::default()
    }
}

fn no_progress(_: u32, _: u32) {}

fn intervals(font: &EpdFontRef) -> Vec<(u32, u32)> {
    font.intervals().map(|i| (i.start(), i.end())).collect()
}

#[test]
fn caps_at_8px_one_bit() {
    let _ = env_logger::builder().is_test(true).try_init();
    let data = epdfont_test_data::ascii_caps();
    let result = convert_fonts(&[data.as_slice()], &options(8, &[(0x20, 0x7E)]), no_progress).unwrap();
    let font = EpdFontRef::read(&result.bytes).unwrap();

    assert_eq!(font.header().flags & 1, 0);
    assert_eq!(intervals(&font), [(65, 90)]);
    assert_eq!(font.glyph_count(), 26);
    assert_eq!(result.stats.glyph_count, 26);
    assert_eq!(result.stats.interval_count, 1);
    assert_eq!(result.stats.byte_size, result.bytes.len());

    let glyphs: Vec<_> = font.glyphs().collect::<Result<_, _>>().unwrap();
    let mut offset = 0;
    for glyph in &glyphs {
        assert!(glyph.width > 0 && glyph.height > 0);
        assert_eq!(
            glyph.data_length as usize,
            packed_len(glyph.width as u32, glyph.height as u32, BitDepth::One)
        );
        assert_eq!(glyph.data_offset, offset);
        offset += glyph.data_length;
    }
    // glyphs get wider through the alphabet
    assert!(glyphs[25].width > glyphs[0].width);
}

#[test]
fn caps_at_8px_two_bit() {
    let data = epdfont_test_data::ascii_caps();
    let options = ConvertOptions {
        bit_depth: BitDepth::Two,
        ..options(8, &[(0x20, 0x7E)])
    };
    let result = convert_fonts(&[data.as_slice()], &options, no_progress).unwrap();
    let font = EpdFontRef::read(&result.bytes).unwrap();

    assert_eq!(font.header().flags & 1, 1);
    assert_eq!(intervals(&font), [(65, 90)]);
    assert_eq!(font.glyph_count(), 26);
    for glyph in font.glyphs() {
        let glyph = glyph.unwrap();
        assert_eq!(
            glyph.data_length as usize,
            (glyph.width as usize * glyph.height as usize).div_ceil(4)
        );
    }
}

#[test]
fn gaps_split_intervals() {
    let data = epdfont_test_data::digits_with_gaps();
    let result = convert_fonts(&[data.as_slice()], &options(12, &[(0x30, 0x39)]), no_progress).unwrap();
    let font = EpdFontRef::read(&result.bytes).unwrap();
    assert_eq!(intervals(&font), [(0x30, 0x32), (0x34, 0x36), (0x38, 0x39)]);
    let offsets: Vec<_> = font.intervals().map(|i| i.glyph_index_offset).collect();
    assert_eq!(offsets, [0, 3, 6]);
    assert_eq!(font.glyph_id('4' as u32), Some(3));
    assert_eq!(font.glyph_id('7' as u32), None);
}

#[test]
fn fallback_stack() {
    let primary = epdfont_test_data::partial_caps_with_bar();
    let fallback = epdfont_test_data::ascii_caps();
    let result = convert_fonts(
        &[primary.as_slice(), fallback.as_slice()],
        &options(10, &[(0x20, 0x7E)]),
        no_progress,
    )
    .unwrap();
    let font = EpdFontRef::read(&result.bytes).unwrap();
    assert_eq!(intervals(&font), [(0x20, 0x20), (0x41, 0x5A), (0x7C, 0x7C)]);

    // A-M come from the primary font, which draws them 1px to the right
    let from_primary = font.glyph('B' as u32).unwrap();
    let from_fallback = font.glyph('N' as u32).unwrap();
    assert_eq!(from_primary.left - from_fallback.left, 1);

    let space = font.glyph(' ' as u32).unwrap();
    assert_eq!((space.width, space.data_length), (0, 0));
    assert!((2..=3).contains(&space.advance_x));

    // vertical metrics come from the font with the bar, which has a line gap:
    // 12px * 1.2
    assert_eq!(result.stats.line_advance, 14);
    assert_eq!(result.stats.ascender, 8);
    assert_eq!(result.stats.descender, -2);
}

#[test]
fn glyph_tops_follow_the_outlines() {
    let primary = epdfont_test_data::partial_caps_with_bar();
    let fallback = epdfont_test_data::ascii_caps();
    let fonts = [primary.as_slice(), fallback.as_slice()];
    let ranges = [(0x41, 0x41), (0x4E, 0x4E), (0x7C, 0x7C)];
    let result = convert_fonts(&fonts, &options(10, &ranges), no_progress).unwrap();
    let font = EpdFontRef::read(&result.bytes).unwrap();

    // caps sit on the baseline and are 700 units tall
    for ch in ['A', 'N'] {
        let glyph = font.glyph(ch as u32).unwrap();
        assert_eq!((glyph.height, glyph.top), (7, 7), "{ch}");
    }
    assert_eq!(font.glyph('N' as u32).unwrap().left, 0);
    // the bar spans -200..800 units
    let bar = font.glyph('|' as u32).unwrap();
    assert_eq!((bar.left, bar.top, bar.width, bar.height), (1, 8, 1, 10));

    let shifted = ConvertOptions {
        baseline_offset: 3,
        ..options(10, &ranges)
    };
    let result = convert_fonts(&fonts, &shifted, no_progress).unwrap();
    let font = EpdFontRef::read(&result.bytes).unwrap();
    assert_eq!(font.glyph('|' as u32).unwrap().top, 11);
    assert_eq!(font.glyph('A' as u32).unwrap().top, 10);
}

#[test]
fn first_row_is_the_top_of_the_glyph() {
    let data = epdfont_test_data::shapes();
    let options = ConvertOptions {
        bit_depth: BitDepth::Two,
        ..options(10, &[(0x2D, 0x2D), (0x54, 0x54)])
    };
    let result = convert_fonts(&[data.as_slice()], &options, no_progress).unwrap();
    let font = EpdFontRef::read(&result.bytes).unwrap();

    let tee = font.glyph('T' as u32).unwrap();
    assert_eq!((tee.width, tee.height, tee.top), (5, 7, 7));
    let levels = font.unpack(&tee).unwrap();
    let rows: Vec<_> = levels.chunks(5).collect();
    assert_eq!(rows[0], [3, 3, 3, 3, 3]);
    for row in &rows[1..] {
        assert_eq!(*row, [0, 0, 3, 0, 0]);
    }

    let dash = font.glyph('-' as u32).unwrap();
    assert_eq!((dash.width, dash.height, dash.top), (3, 1, 4));
}

#[test]
fn advances_and_spacing() {
    let data = epdfont_test_data::ascii_caps();
    let options = ConvertOptions {
        letter_spacing: 2,
        width_scale: 0.5,
        ..options(10, &[(0x41, 0x41)])
    };
    let result = convert_fonts(&[data.as_slice()], &options, no_progress).unwrap();
    let font = EpdFontRef::read(&result.bytes).unwrap();
    // 400 units at 10ppem is 4px, halved and spaced
    assert_eq!(font.glyph('A' as u32).unwrap().advance_x, 4);
}

#[test]
fn uncovered_ranges_give_an_empty_font() {
    let data = epdfont_test_data::ascii_caps();
    let result =
        convert_fonts(&[data.as_slice()], &options(16, &[(0x4E00, 0x4EFF)]), no_progress).unwrap();
    assert_eq!(result.bytes.len(), 32);
    let font = EpdFontRef::read(&result.bytes).unwrap();
    assert_eq!(font.glyph_count(), 0);
    assert_eq!(font.header().interval_count, 0);
}

#[test]
fn bad_font_data() {
    let good = epdfont_test_data::ascii_caps();
    let err = convert_fonts(
        &[good.as_slice(), b"not a font at all".as_slice()],
        &ConvertOptions::default(),
        no_progress,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ConvertError::FontLoad(FontLoadError::Parse { index: 1, .. })
    ));
}

#[test]
fn reader_round_trip() {
    let data = epdfont_test_data::ascii_caps();
    let options = ConvertOptions {
        bit_depth: BitDepth::Two,
        ..options(20, &[(0x41, 0x45), (0x58, 0x5A)])
    };
    let result = convert_fonts(&[data.as_slice()], &options, no_progress).unwrap();
    let font = EpdFontRef::read(&result.bytes).unwrap();
    let header = font.header();
    assert_eq!(header.interval_count, 2);
    assert_eq!(header.glyph_count, 8);
    assert_eq!(header.glyph_table_offset, 32 + 2 * 12);
    assert_eq!(header.bitmap_offset, header.glyph_table_offset + 8 * 16);

    // a box glyph is solid in the middle
    let record = font.glyph('X' as u32).unwrap();
    let levels = font.unpack(&record).unwrap();
    let (w, h) = (record.width as usize, record.height as usize);
    assert_eq!(levels.len(), w * h);
    assert_eq!(levels[(h / 2) * w + w / 2], 3);
}
