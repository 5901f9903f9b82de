#![no_main]
//! Converts a fixed font with fuzzed options and reads the result back.
use std::sync::OnceLock;

use epdfont::{convert_fonts, BitDepth, CodepointRange, ConvertOptions, EpdFontRef};
use libfuzzer_sys::fuzz_target;

fn fonts() -> &'static (Vec<u8>, Vec<u8>) {
    static FONTS: OnceLock<(Vec<u8>, Vec<u8>)> = OnceLock::new();
    FONTS.get_or_init(|| {
        (
            epdfont_test_data::partial_caps_with_bar(),
            epdfont_test_data::ascii_caps(),
        )
    })
}

fuzz_target!(|data: &[u8]| {
    let [size, flags, spacing, offset, rest @ ..] = data else {
        return;
    };
    let ranges = rest
        .chunks_exact(2)
        .take(8)
        .map(|pair| CodepointRange::new(pair[0] as u32, pair[0] as u32 + pair[1] as u32))
        .collect();
    let options = ConvertOptions {
        pixel_size: 8 + (*size % 57) as u32,
        bit_depth: BitDepth::from_flags(*flags),
        letter_spacing: (*spacing % 21) as i32 - 10,
        baseline_offset: (*offset % 41) as i32 - 20,
        width_scale: 0.1 + (*flags >> 1) as f64 / 72.0,
        ranges,
        ..Default::default()
    };
    let (primary, fallback) = fonts();
    if let Ok(result) = convert_fonts(&[primary.as_slice(), fallback.as_slice()], &options, |_: u32, _: u32| {}) {
        let font = EpdFontRef::read(&result.bytes).expect("converted fonts are readable");
        assert_eq!(font.glyph_count(), result.stats.glyph_count);
    }
});
