//! Shared test utilities for the browser crate.
//!
//! Provides a fixed-width [`FixedMetrics`], a [`MockViewport`] that records
//! every draw call and replays scripted input, and a [`ScriptedFetcher`]
//! serving canned responses.

use std::collections::{HashMap, VecDeque};

use lumen_types::backend::{Glyph, LineMetrics, StyleBits, TextMetrics, Viewport};
use lumen_types::color::Color;
use lumen_types::error::Result;
use lumen_types::input::WindowEvent;

use crate::loader::{FetchResponse, Fetcher};

// -------------------------------------------------------------------
// FixedMetrics
// -------------------------------------------------------------------

/// Every character is `CHAR_WIDTH` wide and every line `LINE_HEIGHT` tall,
/// whatever the font size.
///
/// Reports itself as not ready, so painted text arrives at the viewport
/// as whole strings through `draw_string`.
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics;

impl FixedMetrics {
    pub const CHAR_WIDTH: i32 = 8;
    pub const LINE_HEIGHT: i32 = 20;
    pub const ASCENT: i32 = 14;
}

impl TextMetrics for FixedMetrics {
    fn advance(&self, _ch: char, _size: u16) -> i32 {
        Self::CHAR_WIDTH
    }

    fn kerning(&self, _left: char, _right: char, _size: u16) -> i32 {
        0
    }

    fn line_metrics(&self, _size: u16) -> LineMetrics {
        LineMetrics {
            ascent: Self::ASCENT,
            descent: -4,
            line_gap: 2,
        }
    }

    fn glyph(&self, _ch: char, _size: u16, _style: StyleBits) -> Option<Glyph> {
        None
    }

    fn is_ready(&self) -> bool {
        false
    }
}

// -------------------------------------------------------------------
// MockViewport
// -------------------------------------------------------------------

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    FillRect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Color,
    },
    DrawRect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Color,
    },
    HLine {
        x: i32,
        y: i32,
        w: u32,
        color: Color,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        color: Color,
    },
    Glyph {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    },
}

/// A viewport that records draw calls and replays scripted events.
pub struct MockViewport {
    pub width: u32,
    pub height: u32,
    pub calls: Vec<DrawCall>,
    pub events: VecDeque<WindowEvent>,
    /// Every title set, oldest first.
    pub titles: Vec<String>,
    pub invalidations: usize,
    pub destroyed: bool,
}

impl MockViewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
            events: VecDeque::new(),
            titles: Vec::new(),
            invalidations: 0,
            destroyed: false,
        }
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = WindowEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.titles.last().map(String::as_str)
    }

    /// Texts drawn with `draw_string`, in call order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether any drawn text contains `needle`.
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    /// Position of the first drawn text equal to `text`.
    pub fn text_position(&self, text: &str) -> Option<(i32, i32)> {
        self.calls.iter().find_map(|c| match c {
            DrawCall::Text { x, y, text: t, .. } if t == text => Some((*x, *y)),
            _ => None,
        })
    }

    pub fn hline_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::HLine { .. }))
            .count()
    }

    pub fn glyph_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Glyph { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Viewport for MockViewport {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn poll_event(&mut self) -> Option<WindowEvent> {
        self.events.pop_front()
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.calls.push(DrawCall::FillRect { x, y, w, h, color });
        Ok(())
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.calls.push(DrawCall::DrawRect { x, y, w, h, color });
        Ok(())
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: u32, color: Color) -> Result<()> {
        self.calls.push(DrawCall::HLine { x, y, w, color });
        Ok(())
    }

    fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color) -> Result<()> {
        self.calls.push(DrawCall::Text {
            x,
            y,
            text: text.to_string(),
            color,
        });
        Ok(())
    }

    fn draw_glyph(&mut self, x: i32, y: i32, glyph: &Glyph, color: Color) -> Result<()> {
        self.calls.push(DrawCall::Glyph {
            x,
            y,
            width: glyph.width,
            height: glyph.height,
            color,
        });
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.titles.push(title.to_string());
        Ok(())
    }

    fn invalidate(&mut self) -> Result<()> {
        self.invalidations += 1;
        Ok(())
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}

// -------------------------------------------------------------------
// ScriptedFetcher
// -------------------------------------------------------------------

/// Serves canned responses by exact URL; anything else is a 404.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: HashMap<String, FetchResponse>,
    /// Every URL fetched, in order.
    pub requests: Vec<String>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, response: FetchResponse) -> Self {
        self.routes.insert(url.to_string(), response);
        self
    }

    /// Shorthand for a 200 response.
    pub fn page(self, url: &str, body: &str) -> Self {
        self.route(url, FetchResponse::ok(body))
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&mut self, url: &str) -> FetchResponse {
        self.requests.push(url.to_string());
        self.routes
            .get(url)
            .cloned()
            .unwrap_or_else(|| FetchResponse::error(404, format!("no route for {url}")))
    }
}
