//! Software RGBA framebuffer.
//!
//! Viewports draw into a `Framebuffer` and hand the finished pixels to
//! whatever displays them. Text drawn with [`Framebuffer::draw_string`] uses
//! the embedded 8x8 font at scale 1, so every character is 8 px wide.

use crate::backend::Glyph;
use crate::bitmap_font::{self, GLYPH_WIDTH};
use crate::color::Color;

/// Row-major RGBA pixels, 4 bytes per pixel.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

/// Blend one channel of `src` over `dst` at coverage `alpha`.
fn blend_u8(src: u8, dst: u8, alpha: u16) -> u8 {
    ((src as u16 * alpha + dst as u16 * (255 - alpha) + 127) / 255) as u8
}

impl Framebuffer {
    /// A framebuffer filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        let mut fb = Self {
            width,
            height,
            buffer: vec![0; (width * height * 4) as usize],
        };
        fb.clear(Color::BLACK);
        fb
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let offset = self.offset(x, y)?;
        let px = &self.buffer[offset..offset + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(((y as u32 * self.width + x as u32) * 4) as usize)
    }

    pub fn clear(&mut self, color: Color) {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Blend `color` into `(x, y)` at `coverage` scaled by the color's own
    /// alpha. Out-of-bounds pixels are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: u8) {
        let Some(offset) = self.offset(x, y) else {
            return;
        };
        let alpha = (color.a as u16 * coverage as u16 + 127) / 255;
        let px = &mut self.buffer[offset..offset + 4];
        if alpha == 255 {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
        } else if alpha > 0 {
            px[0] = blend_u8(color.r, px[0], alpha);
            px[1] = blend_u8(color.g, px[1], alpha);
            px[2] = blend_u8(color.b, px[2], alpha);
            px[3] = 255;
        }
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.blend_pixel(x, y, color, 255);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        // Clamp to the buffer so huge rectangles stay cheap.
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w as i32).min(self.width as i32);
        let y1 = y.saturating_add(h as i32).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// One-pixel outline.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        if w == 0 || h == 0 {
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h as i32 - 1, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w as i32 - 1, y, 1, h, color);
    }

    pub fn hline(&mut self, x: i32, y: i32, w: u32, color: Color) {
        self.fill_rect(x, y, w, 1, color);
    }

    /// Draw `text` in the embedded font with its top-left corner at
    /// `(x, y)`.
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color) {
        let mut cx = x;
        for ch in text.chars() {
            let rows = bitmap_font::glyph(ch);
            for row in 0..bitmap_font::GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if bitmap_font::pixel_set(rows, col, row) {
                        self.set_pixel(cx + col as i32, y + row as i32, color);
                    }
                }
            }
            cx += GLYPH_WIDTH as i32;
        }
    }

    /// Blend a coverage bitmap with its top-left corner at `(x, y)`.
    pub fn draw_glyph(&mut self, x: i32, y: i32, glyph: &Glyph, color: Color) {
        for (i, &coverage) in glyph.coverage.iter().enumerate() {
            if coverage == 0 {
                continue;
            }
            let gx = (i as u32 % glyph.width) as i32;
            let gy = (i as u32 / glyph.width) as i32;
            self.blend_pixel(x + gx, y + gy, color, coverage);
        }
    }
}
