//! Font-size fitting.
//!
//! Finds the largest font size at which the laid-out text block plus
//! margins fits the label, stopping at the minimum size even if the text
//! still overflows. Relies on [`TextMeasure`] being monotonic, so the
//! search is a bisection over `min..=start`.

use super::context::Margins;
use super::font::TextMeasure;
use crate::media::PixelSize;

/// Replace empty lines with a single space.
///
/// Zero-height lines otherwise throw off the block height.
pub fn normalize_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| if line.is_empty() { " " } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

fn fits(measure: &dyn TextMeasure, text: &str, size: u32, available: PixelSize, margins: &Margins) -> bool {
    let block = measure.measure(text, size);
    block.width.saturating_add(margins.horizontal()) <= available.width
        && block.height.saturating_add(margins.vertical()) <= available.height
}

/// Largest font size in `min..=start` at which `text` fits inside
/// `available` with `margins`.
///
/// Never returns less than `min`; a `start` below `min` is raised to it.
/// `start` is capped at the label height, since an em taller than the
/// label never fits.
pub fn fit(
    measure: &dyn TextMeasure,
    text: &str,
    start: u32,
    min: u32,
    available: PixelSize,
    margins: &Margins,
) -> u32 {
    let min = min.max(1);
    let text = normalize_lines(text);
    let start = start.min(available.height).max(min);

    let mut low = min;
    let mut high = start;
    if !fits(measure, &text, low, available, margins) {
        log::debug!("text overflows even at minimum font size {}", min);
        return min;
    }
    // `low` always fits
    while low < high {
        let mid = low + (high - low).div_ceil(2);
        if fits(measure, &text, mid, available, margins) {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    log::debug!("fitted font size {} (start {}, min {})", low, start, min);
    low
}

// ============================================================================
// TESTS
// ============================================================================
