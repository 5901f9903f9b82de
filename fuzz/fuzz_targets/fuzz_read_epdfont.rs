#![no_main]
use epdfont::{EpdFontRef, ReadError};
use libfuzzer_sys::fuzz_target;

fn do_reader_things(data: &[u8]) -> Result<(), ReadError> {
    let font = EpdFontRef::read(data)?;
    let _ = font.header().bit_depth();
    for interval in font.intervals().take(64) {
        for code_point in [interval.start(), interval.end(), interval.end().wrapping_add(1)] {
            if let Some(glyph) = font.glyph(code_point) {
                let _ = font.unpack(&glyph);
            }
        }
    }
    for glyph in font.glyphs().take(256) {
        let _ = font.bitmap(&glyph?);
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = do_reader_things(data);
});
