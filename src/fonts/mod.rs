//! Metrics for the built-in PDF fonts used by the report.
//!
//! The report only uses the standard Helvetica faces, which every PDF viewer ships, so nothing is
//! embedded.  Text measurement relies on the advance widths from the Adobe core font metrics.
//! Widths are in 1/1000 em; index = (char as usize) - 32, covering 0x20 (space) through 0x7E (~).

use crate::canvas::FontStyle;

/// Advance width used for characters outside the tables.
const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn widths(font: FontStyle) -> &'static [u16; 95] {
    match font {
        FontStyle::Regular => &HELVETICA_WIDTHS,
        FontStyle::Bold => &HELVETICA_BOLD_WIDTHS,
    }
}

/// Returns the advance width of `ch` in 1/1000 em.
pub fn char_width(ch: char, font: FontStyle) -> u16 {
    let code = ch as usize;
    if (32..=126).contains(&code) {
        widths(font)[code - 32]
    } else {
        FALLBACK_WIDTH
    }
}

/// Measures `text` in points when set in `font` at `size` points.
pub fn text_width(text: &str, font: FontStyle, size: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| u32::from(char_width(ch, font))).sum();
    f64::from(units) * size / 1000.0
}
