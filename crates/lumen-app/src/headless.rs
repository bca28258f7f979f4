//! Offscreen viewport used when no window system is compiled in.
//!
//! Renders into a [`Framebuffer`] and replays a fixed list of events. Once
//! the script runs out it reports a close, so the browser loads its page,
//! paints once and exits.

use std::collections::VecDeque;

use lumen_types::backend::{Glyph, Viewport};
use lumen_types::color::Color;
use lumen_types::error::Result;
use lumen_types::framebuffer::Framebuffer;
use lumen_types::input::{Key, WindowEvent};

/// Parse a comma-separated list of host key codes, decimal or `0x` hex,
/// into key events.
pub fn parse_key_script(script: &str) -> anyhow::Result<Vec<WindowEvent>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            let value = match code.strip_prefix("0x").or_else(|| code.strip_prefix("0X")) {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => code.parse(),
            };
            value
                .map(|v| WindowEvent::Key(Key::from_code(v)))
                .map_err(|e| anyhow::anyhow!("bad key code {code:?}: {e}"))
        })
        .collect()
}

pub struct HeadlessViewport {
    frame: Framebuffer,
    events: VecDeque<WindowEvent>,
    title: String,
    /// Number of completed frames.
    frames: usize,
    destroyed: bool,
}

impl HeadlessViewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: Framebuffer::new(width, height),
            events: VecDeque::new(),
            title: String::new(),
            frames: 0,
            destroyed: false,
        }
    }

    /// Queue events to deliver before the closing event.
    pub fn with_events(mut self, events: impl IntoIterator<Item = WindowEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn frame(&self) -> &Framebuffer {
        &self.frame
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Viewport for HeadlessViewport {
    fn size(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    fn poll_event(&mut self) -> Option<WindowEvent> {
        Some(self.events.pop_front().unwrap_or(WindowEvent::Close))
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.frame.fill_rect(x, y, w, h, color);
        Ok(())
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.frame.draw_rect(x, y, w, h, color);
        Ok(())
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: u32, color: Color) -> Result<()> {
        self.frame.hline(x, y, w, color);
        Ok(())
    }

    fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color) -> Result<()> {
        self.frame.draw_string(x, y, text, color);
        Ok(())
    }

    fn draw_glyph(&mut self, x: i32, y: i32, glyph: &Glyph, color: Color) -> Result<()> {
        self.frame.draw_glyph(x, y, glyph, color);
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        log::debug!("title: {title}");
        self.title = title.to_string();
        Ok(())
    }

    fn invalidate(&mut self) -> Result<()> {
        self.frames += 1;
        Ok(())
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}
