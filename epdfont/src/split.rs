//! Splitting candidate ranges around code points that cannot be rendered.

use crate::{error::ConvertError, ranges::CodepointRange};

/// Sort candidate ranges by start and clip each one so that it begins after
/// every earlier range ends.
///
/// Ranges fully covered by an earlier one are dropped. Inverted ranges are
/// an error.
pub fn normalize(candidates: &[CodepointRange]) -> Result<Vec<CodepointRange>, ConvertError> {
    if let Some(bad) = candidates.iter().find(|range| range.start > range.end) {
        return Err(ConvertError::InvalidRange {
            start: bad.start,
            end: bad.end,
        });
    }
    let mut sorted = candidates.to_vec();
    sorted.sort_by_key(|range| range.start);

    let mut result: Vec<CodepointRange> = Vec::with_capacity(sorted.len());
    let mut covered_to: Option<u32> = None;
    for mut range in sorted {
        if let Some(prev_end) = covered_to {
            if range.end <= prev_end {
                log::debug!("dropping {range:?}, already covered up to {prev_end:04X}");
                continue;
            }
            if range.start <= prev_end {
                log::debug!("clipping {range:?} to start after {prev_end:04X}");
                range.start = prev_end + 1;
            }
        }
        covered_to = Some(range.end);
        result.push(range);
    }
    Ok(result)
}

/// Split candidate ranges into runs of code points accepted by
/// `is_renderable`.
///
/// Each candidate yields zero or more ranges, in order. Runs from different
/// candidates are never merged, even when they touch.
pub fn split_ranges(
    candidates: &[CodepointRange],
    mut is_renderable: impl FnMut(u32) -> bool,
) -> Result<Vec<CodepointRange>, ConvertError> {
    let mut result = Vec::new();
    for range in normalize(candidates)? {
        // one past the last rejected code point
        let mut segment_start = range.start as u64;
        for code_point in range.iter() {
            if is_renderable(code_point) {
                continue;
            }
            log::trace!("U+{code_point:04X} is not renderable");
            if segment_start < code_point as u64 {
                result.push(CodepointRange::new(segment_start as u32, code_point - 1));
            }
            segment_start = code_point as u64 + 1;
        }
        if segment_start <= range.end as u64 {
            result.push(CodepointRange::new(segment_start as u32, range.end));
        }
    }
    Ok(result)
}
