//! Viewport and scroll offset management.

/// Scroll state for the page area.
///
/// `scroll_y` always stays within `[0, max_scroll()]`.
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Current vertical scroll offset in pixels.
    pub scroll_y: i32,
    /// Total content height (from layout).
    pub content_height: i32,
    /// Visible page height (window minus chrome).
    pub viewport_height: i32,
    /// Pixels moved by one line step.
    line_step: i32,
}

impl ScrollState {
    pub fn new(viewport_height: i32, line_step: i32) -> Self {
        Self {
            scroll_y: 0,
            content_height: 0,
            viewport_height,
            line_step,
        }
    }

    /// Scroll up by one line.
    pub fn line_up(&mut self) {
        self.scroll_by(-self.line_step);
    }

    /// Scroll down by one line.
    pub fn line_down(&mut self) {
        self.scroll_by(self.line_step);
    }

    /// Scroll up by one viewport height.
    pub fn page_up(&mut self) {
        self.scroll_by(-self.viewport_height);
    }

    /// Scroll down by one viewport height.
    pub fn page_down(&mut self) {
        self.scroll_by(self.viewport_height);
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll_y = self.scroll_y.saturating_add(delta);
        self.clamp();
    }

    /// Scroll to an absolute position.
    pub fn scroll_to(&mut self, y: i32) {
        self.scroll_y = y;
        self.clamp();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_y = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_y = self.max_scroll();
    }

    /// Update content height (after layout).
    pub fn set_content_height(&mut self, height: i32) {
        self.content_height = height;
        self.clamp();
    }

    /// Get the maximum scroll offset.
    pub fn max_scroll(&self) -> i32 {
        (self.content_height - self.viewport_height).max(0)
    }

    /// Clamp scroll_y to valid range [0, max_scroll].
    fn clamp(&mut self) {
        self.scroll_y = self.scroll_y.clamp(0, self.max_scroll());
    }

    /// Reset scroll state (for new page load).
    pub fn reset(&mut self) {
        self.scroll_y = 0;
        self.content_height = 0;
    }

    /// Scrollbar thumb `(offset, height)` within a track of `track_height`
    /// pixels. `None` when the page fits and no scrollbar is shown.
    pub fn thumb(&self, track_height: i32, min_height: i32) -> Option<(i32, i32)> {
        let max = self.max_scroll();
        if max == 0 || self.content_height <= 0 {
            return None;
        }
        let height = (i64::from(track_height) * i64::from(self.viewport_height)
            / i64::from(self.content_height)) as i32;
        let height = height.max(min_height).min(track_height);
        let offset =
            (i64::from(track_height - height) * i64::from(self.scroll_y) / i64::from(max)) as i32;
        Some((offset, height))
    }
}
