//! Host trait definitions.
//!
//! The engine never calls platform APIs directly. Painting goes through
//! [`Viewport`], text measurement and glyph rasterization through
//! [`TextMetrics`], and sockets through [`NetworkBackend`] /
//! [`NetworkStream`].

use std::net::IpAddr;
use std::ops::BitOr;

use crate::color::Color;
use crate::error::Result;
use crate::input::WindowEvent;

// ---------------------------------------------------------------------------
// Text styling and metrics
// ---------------------------------------------------------------------------

/// Bold / italic flags carried by text runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleBits(u8);

impl StyleBits {
    pub const NONE: Self = Self(0);
    pub const BOLD: Self = Self(1);
    pub const ITALIC: Self = Self(2);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_bold(self) -> bool {
        self.contains(Self::BOLD)
    }

    pub const fn is_italic(self) -> bool {
        self.contains(Self::ITALIC)
    }
}

impl BitOr for StyleBits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Vertical font metrics for one pixel size.
///
/// `descent` is negative (below the baseline), following the usual font
/// table convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMetrics {
    pub ascent: i32,
    pub descent: i32,
    pub line_gap: i32,
}

impl LineMetrics {
    /// Distance between consecutive baselines.
    pub fn line_height(&self) -> i32 {
        self.ascent - self.descent + self.line_gap
    }
}

/// A rasterized glyph: an 8-bit coverage bitmap plus placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    pub width: u32,
    pub height: u32,
    /// Horizontal offset from the pen position to the bitmap's left edge.
    pub bearing_x: i32,
    /// Distance from the baseline up to the bitmap's top edge.
    pub bearing_y: i32,
    pub advance: u32,
    /// Row-major coverage, `width * height` bytes, 0 = transparent.
    pub coverage: Vec<u8>,
}

/// Font measurement and rasterization provided by the host.
pub trait TextMetrics {
    /// Horizontal advance of `ch` at `size` pixels.
    fn advance(&self, ch: char, size: u16) -> i32;

    /// Kerning adjustment between a code-point pair.
    fn kerning(&self, left: char, right: char, size: u16) -> i32;

    fn line_metrics(&self, size: u16) -> LineMetrics;

    /// Rasterize `ch`. `None` when the font has no glyph for it.
    fn glyph(&self, ch: char, size: u16, style: StyleBits) -> Option<Glyph>;

    /// Whether glyph rasterization is available. When false the painter
    /// falls back to [`Viewport::draw_string`].
    fn is_ready(&self) -> bool {
        true
    }

    /// Width of `text`: advances plus pairwise kerning.
    fn measure(&self, text: &str, size: u16) -> i32 {
        let mut width = 0;
        let mut prev: Option<char> = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                width += self.kerning(p, ch, size);
            }
            width += self.advance(ch, size);
            prev = Some(ch);
        }
        width
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// A window the browser paints into and receives input from.
///
/// All coordinates are window-relative pixels.
pub trait Viewport {
    /// Window size in pixels.
    fn size(&self) -> (u32, u32);

    /// Next pending input event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<WindowEvent>;

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()>;

    /// One-pixel rectangle outline.
    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()>;

    fn draw_hline(&mut self, x: i32, y: i32, w: u32, color: Color) -> Result<()>;

    /// Draw text with the host's builtin fixed-width font (8 px per char).
    fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color) -> Result<()>;

    /// Blend a coverage bitmap with its top-left corner at `(x, y)`.
    fn draw_glyph(&mut self, x: i32, y: i32, glyph: &Glyph, color: Color) -> Result<()>;

    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Present everything drawn since the last call.
    fn invalidate(&mut self) -> Result<()>;

    /// Release the window. No other method is called afterwards.
    fn destroy(&mut self);
}

// ---------------------------------------------------------------------------
// Networking
// ---------------------------------------------------------------------------

/// Host DNS and TCP.
pub trait NetworkBackend {
    /// Resolve a host name to an address.
    fn resolve(&self, host: &str) -> Result<IpAddr>;

    /// Open an outbound TCP connection.
    fn connect(&self, addr: IpAddr, port: u16) -> Result<Box<dyn NetworkStream>>;
}

/// A bidirectional byte stream (TCP or TLS connection).
///
/// `read` returns `Ok(0)` when nothing is available yet; callers poll.
pub trait NetworkStream: Send {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
    fn write(&mut self, data: &[u8]) -> Result<usize>;
    fn close(&mut self) -> Result<()>;
}
