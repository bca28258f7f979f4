//! Embedded 8x8 bitmap font covering printable ASCII.
//!
//! Each glyph is eight row bytes, top row first. Bit 0 of a row is the
//! leftmost pixel. [`BitmapTextMetrics`] scales the cells by whole pixels
//! (`size / 8`, minimum 1) so every backend can measure and rasterize text
//! without a font file.

use crate::backend::{Glyph, LineMetrics, StyleBits, TextMetrics};

pub const GLYPH_WIDTH: u32 = 8;
pub const GLYPH_HEIGHT: u32 = 8;

/// Rows above the baseline in an unscaled cell.
const BASELINE_ROW: i32 = 7;

/// Glyphs for `' '..='~'`.
#[rustfmt::skip]
static GLYPHS: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x18, 0x3C, 0x3C, 0x18, 0x18, 0x00, 0x18, 0x00], // !
    [0x36, 0x36, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // "
    [0x36, 0x36, 0x7F, 0x36, 0x7F, 0x36, 0x36, 0x00], // #
    [0x0C, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x0C, 0x00], // $
    [0x00, 0x63, 0x33, 0x18, 0x0C, 0x66, 0x63, 0x00], // %
    [0x1C, 0x36, 0x1C, 0x6E, 0x3B, 0x33, 0x6E, 0x00], // &
    [0x06, 0x06, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00], // '
    [0x18, 0x0C, 0x06, 0x06, 0x06, 0x0C, 0x18, 0x00], // (
    [0x06, 0x0C, 0x18, 0x18, 0x18, 0x0C, 0x06, 0x00], // )
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // *
    [0x00, 0x0C, 0x0C, 0x3F, 0x0C, 0x0C, 0x00, 0x00], // +
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x06], // ,
    [0x00, 0x00, 0x00, 0x3F, 0x00, 0x00, 0x00, 0x00], // -
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x00], // .
    [0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x01, 0x00], // /
    [0x3E, 0x63, 0x73, 0x7B, 0x6F, 0x67, 0x3E, 0x00], // 0
    [0x0C, 0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x3F, 0x00], // 1
    [0x1E, 0x33, 0x30, 0x1C, 0x06, 0x33, 0x3F, 0x00], // 2
    [0x1E, 0x33, 0x30, 0x1C, 0x30, 0x33, 0x1E, 0x00], // 3
    [0x38, 0x3C, 0x36, 0x33, 0x7F, 0x30, 0x78, 0x00], // 4
    [0x3F, 0x03, 0x1F, 0x30, 0x30, 0x33, 0x1E, 0x00], // 5
    [0x1C, 0x06, 0x03, 0x1F, 0x33, 0x33, 0x1E, 0x00], // 6
    [0x3F, 0x33, 0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x00], // 7
    [0x1E, 0x33, 0x33, 0x1E, 0x33, 0x33, 0x1E, 0x00], // 8
    [0x1E, 0x33, 0x33, 0x3E, 0x30, 0x18, 0x0E, 0x00], // 9
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x00], // :
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x06], // ;
    [0x18, 0x0C, 0x06, 0x03, 0x06, 0x0C, 0x18, 0x00], // <
    [0x00, 0x00, 0x3F, 0x00, 0x00, 0x3F, 0x00, 0x00], // =
    [0x06, 0x0C, 0x18, 0x30, 0x18, 0x0C, 0x06, 0x00], // >
    [0x1E, 0x33, 0x30, 0x18, 0x0C, 0x00, 0x0C, 0x00], // ?
    [0x3E, 0x63, 0x7B, 0x7B, 0x7B, 0x03, 0x1E, 0x00], // @
    [0x0C, 0x1E, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x00], // A
    [0x3F, 0x66, 0x66, 0x3E, 0x66, 0x66, 0x3F, 0x00], // B
    [0x3C, 0x66, 0x03, 0x03, 0x03, 0x66, 0x3C, 0x00], // C
    [0x1F, 0x36, 0x66, 0x66, 0x66, 0x36, 0x1F, 0x00], // D
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x46, 0x7F, 0x00], // E
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x06, 0x0F, 0x00], // F
    [0x3C, 0x66, 0x03, 0x03, 0x73, 0x66, 0x7C, 0x00], // G
    [0x33, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x33, 0x00], // H
    [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // I
    [0x78, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E, 0x00], // J
    [0x67, 0x66, 0x36, 0x1E, 0x36, 0x66, 0x67, 0x00], // K
    [0x0F, 0x06, 0x06, 0x06, 0x46, 0x66, 0x7F, 0x00], // L
    [0x63, 0x77, 0x7F, 0x7F, 0x6B, 0x63, 0x63, 0x00], // M
    [0x63, 0x67, 0x6F, 0x7B, 0x73, 0x63, 0x63, 0x00], // N
    [0x1C, 0x36, 0x63, 0x63, 0x63, 0x36, 0x1C, 0x00], // O
    [0x3F, 0x66, 0x66, 0x3E, 0x06, 0x06, 0x0F, 0x00], // P
    [0x1E, 0x33, 0x33, 0x33, 0x3B, 0x1E, 0x38, 0x00], // Q
    [0x3F, 0x66, 0x66, 0x3E, 0x36, 0x66, 0x67, 0x00], // R
    [0x1E, 0x33, 0x07, 0x0E, 0x38, 0x33, 0x1E, 0x00], // S
    [0x3F, 0x2D, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // T
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x33, 0x3F, 0x00], // U
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // V
    [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00], // W
    [0x63, 0x63, 0x36, 0x1C, 0x1C, 0x36, 0x63, 0x00], // X
    [0x33, 0x33, 0x33, 0x1E, 0x0C, 0x0C, 0x1E, 0x00], // Y
    [0x7F, 0x63, 0x31, 0x18, 0x4C, 0x66, 0x7F, 0x00], // Z
    [0x1E, 0x06, 0x06, 0x06, 0x06, 0x06, 0x1E, 0x00], // [
    [0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x40, 0x00], // backslash
    [0x1E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x1E, 0x00], // ]
    [0x08, 0x1C, 0x36, 0x63, 0x00, 0x00, 0x00, 0x00], // ^
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // _
    [0x0C, 0x0C, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // `
    [0x00, 0x00, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // a
    [0x07, 0x06, 0x06, 0x3E, 0x66, 0x66, 0x3B, 0x00], // b
    [0x00, 0x00, 0x1E, 0x33, 0x03, 0x33, 0x1E, 0x00], // c
    [0x38, 0x30, 0x30, 0x3E, 0x33, 0x33, 0x6E, 0x00], // d
    [0x00, 0x00, 0x1E, 0x33, 0x3F, 0x03, 0x1E, 0x00], // e
    [0x1C, 0x36, 0x06, 0x0F, 0x06, 0x06, 0x0F, 0x00], // f
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x1F], // g
    [0x07, 0x06, 0x36, 0x6E, 0x66, 0x66, 0x67, 0x00], // h
    [0x0C, 0x00, 0x0E, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // i
    [0x30, 0x00, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E], // j
    [0x07, 0x06, 0x66, 0x36, 0x1E, 0x36, 0x67, 0x00], // k
    [0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // l
    [0x00, 0x00, 0x33, 0x7F, 0x7F, 0x6B, 0x63, 0x00], // m
    [0x00, 0x00, 0x1F, 0x33, 0x33, 0x33, 0x33, 0x00], // n
    [0x00, 0x00, 0x1E, 0x33, 0x33, 0x33, 0x1E, 0x00], // o
    [0x00, 0x00, 0x3B, 0x66, 0x66, 0x3E, 0x06, 0x0F], // p
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x78], // q
    [0x00, 0x00, 0x3B, 0x6E, 0x66, 0x06, 0x0F, 0x00], // r
    [0x00, 0x00, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x00], // s
    [0x08, 0x0C, 0x3E, 0x0C, 0x0C, 0x2C, 0x18, 0x00], // t
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x33, 0x6E, 0x00], // u
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // v
    [0x00, 0x00, 0x63, 0x6B, 0x7F, 0x7F, 0x36, 0x00], // w
    [0x00, 0x00, 0x63, 0x36, 0x1C, 0x36, 0x63, 0x00], // x
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x3E, 0x30, 0x1F], // y
    [0x00, 0x00, 0x3F, 0x19, 0x0C, 0x26, 0x3F, 0x00], // z
    [0x38, 0x0C, 0x0C, 0x07, 0x0C, 0x0C, 0x38, 0x00], // {
    [0x18, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x00], // |
    [0x07, 0x0C, 0x0C, 0x38, 0x0C, 0x0C, 0x07, 0x00], // }
    [0x6E, 0x3B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ~
];

/// Row data for `ch`. Characters outside printable ASCII render as `?`.
pub fn glyph(ch: char) -> &'static [u8; 8] {
    let idx = match ch {
        ' '..='~' => ch as usize - 0x20,
        _ => '?' as usize - 0x20,
    };
    &GLYPHS[idx]
}

/// Whether pixel `(col, row)` of an unscaled glyph is set.
pub fn pixel_set(rows: &[u8; 8], col: u32, row: u32) -> bool {
    col < GLYPH_WIDTH && row < GLYPH_HEIGHT && rows[row as usize] & (1 << col) != 0
}

/// Integer scale factor for a font size.
pub fn scale_for(size: u16) -> u32 {
    u32::from(size / 8).max(1)
}

/// [`TextMetrics`] over the embedded font.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapTextMetrics;

impl BitmapTextMetrics {
    pub fn new() -> Self {
        Self
    }
}

impl TextMetrics for BitmapTextMetrics {
    fn advance(&self, _ch: char, size: u16) -> i32 {
        (GLYPH_WIDTH * scale_for(size)) as i32
    }

    fn kerning(&self, _left: char, _right: char, _size: u16) -> i32 {
        0
    }

    fn line_metrics(&self, size: u16) -> LineMetrics {
        let s = scale_for(size) as i32;
        LineMetrics {
            ascent: BASELINE_ROW * s,
            descent: -s,
            line_gap: 2 * s,
        }
    }

    fn glyph(&self, ch: char, size: u16, style: StyleBits) -> Option<Glyph> {
        let rows = glyph(ch);
        let scale = scale_for(size);
        // Italic shears up to two cells to the right at the top row.
        let slant = if style.is_italic() { 2 } else { 0 };
        let embolden = u32::from(style.is_bold());
        let cell_w = GLYPH_WIDTH + slant + embolden;
        let width = cell_w * scale;
        let height = GLYPH_HEIGHT * scale;
        let mut coverage = vec![0u8; (width * height) as usize];

        for row in 0..GLYPH_HEIGHT {
            let shift = if slant > 0 { (GLYPH_HEIGHT - 1 - row) / 3 } else { 0 };
            for col in 0..GLYPH_WIDTH {
                let on = pixel_set(rows, col, row)
                    || (embolden == 1 && col > 0 && pixel_set(rows, col - 1, row));
                if !on {
                    continue;
                }
                let cx = col + shift;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = cx * scale + dx;
                        let py = row * scale + dy;
                        coverage[(py * width + px) as usize] = 255;
                    }
                }
            }
            // Bold extends the last column one cell to the right.
            if embolden == 1 && pixel_set(rows, GLYPH_WIDTH - 1, row) {
                let cx = GLYPH_WIDTH + shift;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = cx * scale + dx;
                        let py = row * scale + dy;
                        coverage[(py * width + px) as usize] = 255;
                    }
                }
            }
        }

        Some(Glyph {
            width,
            height,
            bearing_x: 0,
            bearing_y: BASELINE_ROW * scale as i32,
            advance: GLYPH_WIDTH * scale,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn space_is_blank() {
        assert!(glyph(' ').iter().all(|&r| r == 0));
    }

    #[test]
    fn non_ascii_falls_back_to_question_mark() {
        assert_eq!(glyph('\u{e9}'), glyph('?'));
        assert_eq!(glyph('\n'), glyph('?'));
    }

    #[test]
    fn underscore_fills_bottom_row() {
        let rows = glyph('_');
        for col in 0..8 {
            assert!(pixel_set(rows, col, 7));
            assert!(!pixel_set(rows, col, 0));
        }
    }

    #[test]
    fn scale_has_floor_of_one() {
        assert_eq!(scale_for(0), 1);
        assert_eq!(scale_for(7), 1);
        assert_eq!(scale_for(16), 2);
        assert_eq!(scale_for(28), 3);
    }

    #[test]
    fn default_size_line_height() {
        let m = BitmapTextMetrics.line_metrics(16);
        assert_eq!(m.line_height(), 20);
        assert_eq!(m.ascent, 14);
    }

    #[test]
    fn glyph_bitmap_matches_scale() {
        let g = BitmapTextMetrics.glyph('A', 16, StyleBits::NONE).unwrap();
        assert_eq!((g.width, g.height), (16, 16));
        assert_eq!(g.coverage.len(), 256);
        assert_eq!(g.advance, 16);
        assert!(g.coverage.iter().any(|&c| c == 255));
    }

    #[test]
    fn bold_glyph_has_more_ink() {
        let plain = BitmapTextMetrics.glyph('l', 8, StyleBits::NONE).unwrap();
        let bold = BitmapTextMetrics.glyph('l', 8, StyleBits::BOLD).unwrap();
        let ink = |g: &Glyph| g.coverage.iter().filter(|&&c| c > 0).count();
        assert!(ink(&bold) > ink(&plain));
        assert_eq!(bold.advance, plain.advance);
    }

    #[test]
    fn italic_glyph_is_wider() {
        let plain = BitmapTextMetrics.glyph('I', 8, StyleBits::NONE).unwrap();
        let italic = BitmapTextMetrics.glyph('I', 8, StyleBits::ITALIC).unwrap();
        assert!(italic.width > plain.width);
    }

    proptest! {
        #[test]
        fn measure_is_additive(a in "[ -~]{0,20}", b in "[ -~]{0,20}") {
            let m = BitmapTextMetrics;
            let joined = format!("{a}{b}");
            prop_assert_eq!(m.measure(&joined, 16), m.measure(&a, 16) + m.measure(&b, 16));
        }
    }
}
