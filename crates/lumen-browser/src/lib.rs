//! Lumen's page engine and browser controller.
//!
//! The pipeline for one page is: resolve the URL ([`url`]), fetch it
//! ([`loader`]), parse the body ([`html`]), lay the tree out ([`layout`]),
//! and paint the result ([`paint`], [`chrome`]). [`Browser`] drives that
//! pipeline and reacts to window input.
//!
//! The browser never touches a platform directly: it paints through a
//! [`Viewport`], measures text through [`TextMetrics`] and fetches through
//! a [`Fetcher`].

pub mod chrome;
pub mod config;
pub mod html;
pub mod layout;
pub mod loader;
pub mod nav;
pub mod paint;
pub mod scroll;
pub mod url;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::BrowserConfig;
pub use loader::{FetchResponse, Fetcher, Loader};
pub use nav::History;
pub use scroll::ScrollState;

use std::time::Duration;

use lumen_types::backend::{TextMetrics, Viewport};
use lumen_types::input::{Key, WindowEvent};

use crate::chrome::ChromeHit;
use crate::layout::{LayoutParams, LayoutResult};

/// Longest window title shown, in characters.
const MAX_TITLE_CHARS: usize = 40;

/// Sleep between polls when no input is pending.
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Whether keystrokes go to the page or to the address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    EditingAddress,
}

/// A single-window browser.
///
/// Owns the viewport it paints into until [`Browser::run`] hands it back.
pub struct Browser<V: Viewport, F: Fetcher> {
    viewport: V,
    fetcher: F,
    metrics: Box<dyn TextMetrics>,
    config: BrowserConfig,
    params: LayoutParams,

    /// URL of the page on screen. Empty before the first load.
    url: String,
    /// Address-field text. Equal to `url` except while editing.
    address: String,
    /// Edit cursor, in characters.
    cursor: usize,
    mode: Mode,

    history: History,
    layout: LayoutResult,
    scroll: ScrollState,
    /// Title as shown in the window.
    title: String,
}

impl<V: Viewport, F: Fetcher> Browser<V, F> {
    /// Create a browser painting into `viewport`.
    ///
    /// A viewport reporting a non-zero size overrides the configured
    /// window size.
    pub fn new(
        viewport: V,
        fetcher: F,
        metrics: Box<dyn TextMetrics>,
        mut config: BrowserConfig,
    ) -> Self {
        let (width, height) = viewport.size();
        if width > 0 && height > 0 {
            config.window_width = width;
            config.window_height = height;
        }
        let params = LayoutParams::from_config(&config);
        let scroll = ScrollState::new(config.content_height(), config.scroll_step);
        let history = History::new(config.max_history);

        Self {
            viewport,
            fetcher,
            metrics,
            params,
            url: String::new(),
            address: String::new(),
            cursor: 0,
            mode: Mode::Viewing,
            history,
            layout: LayoutResult::default(),
            scroll,
            title: String::new(),
            config,
        }
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn current_url(&self) -> &str {
        &self.url
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn page(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    // ---------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------

    /// Navigate to `target`, resolved against the current page.
    ///
    /// The page being left is recorded in the history.
    pub fn navigate(&mut self, target: &str) {
        let resolved = url::resolve(&self.url, target);
        if !self.url.is_empty() {
            let previous = std::mem::take(&mut self.url);
            self.history.push(&previous);
        }
        self.load(resolved);
    }

    /// Return to the most recent history entry. No-op with empty history.
    pub fn back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.load(previous);
        }
    }

    /// Reload the current page without touching the history.
    pub fn refresh(&mut self) {
        if !self.url.is_empty() {
            let current = self.url.clone();
            self.load(current);
        }
    }

    /// Fetch, parse, lay out and paint `target`, which must be absolute.
    fn load(&mut self, target: String) {
        log::info!("navigate: {target}");
        self.url = target;
        self.address = self.url.clone();
        self.cursor = 0;
        self.mode = Mode::Viewing;
        self.scroll.reset();
        self.show_loading();

        let response = self.fetch_following_redirects();
        let body = if response.status == 200 {
            response.body
        } else {
            log::warn!("{}: status {}", self.url, response.status);
            error_page(response.status, &response.body)
        };

        let root = html::parse(&body);
        self.layout = layout::layout(&root, self.metrics.as_ref(), &self.params);
        self.scroll.set_content_height(self.layout.total_height);

        let title = html::title(&root).unwrap_or_else(|| self.url.clone());
        self.title = title.chars().take(MAX_TITLE_CHARS).collect();
        if let Err(e) = self.viewport.set_title(&self.title) {
            log::warn!("set title: {e}");
        }
        self.repaint();
        log::info!(
            "loaded {}: {} blocks, {} links, {} px",
            self.url,
            self.layout.blocks.len(),
            self.layout.links.len(),
            self.layout.total_height
        );
    }

    /// Fetch the current URL. Each redirect hop replaces the current URL
    /// without recording history.
    fn fetch_following_redirects(&mut self) -> FetchResponse {
        let mut response = self.fetcher.fetch(&self.url);
        let mut hops = 0;
        while response.is_redirect() {
            let Some(location) = response.location.take() else {
                break;
            };
            if hops == self.config.max_redirects {
                return FetchResponse::error(0, "Too many redirects");
            }
            hops += 1;
            let next = url::resolve(&self.url, &location);
            log::debug!("redirect {} ({}) -> {next}", self.url, response.status);
            self.url = next;
            self.address = self.url.clone();
            response = self.fetcher.fetch(&self.url);
        }
        response
    }

    fn show_loading(&mut self) {
        let result = self.viewport.set_title("Loading...").and_then(|()| {
            chrome::paint_address_bar(&mut self.viewport, &self.address, None, &self.config)
        });
        let result = result.and_then(|()| self.viewport.invalidate());
        if let Err(e) = result {
            log::warn!("loading indicator: {e}");
        }
        std::thread::yield_now();
    }

    // ---------------------------------------------------------------
    // Input handling
    // ---------------------------------------------------------------

    /// Handle a mouse press at window coordinates.
    pub fn handle_click(&mut self, x: i32, y: i32) {
        match chrome::hit_test(x, y, self.config.address_bar_height as i32) {
            ChromeHit::Back => self.back(),
            ChromeHit::Refresh => self.refresh(),
            ChromeHit::Address => {
                self.mode = Mode::EditingAddress;
                self.cursor = self.address.chars().count();
                self.repaint_address_bar();
            },
            ChromeHit::Strip => {},
            ChromeHit::Content => {
                let doc_y = y - self.config.content_y() + self.scroll.scroll_y;
                if let Some(link) = self.layout.link_at(x, doc_y) {
                    let href = link.href.clone();
                    self.navigate(&href);
                }
            },
        }
    }

    /// Handle a key press. Returns `false` when the browser should close.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match self.mode {
            Mode::EditingAddress => {
                self.edit_address(key);
                true
            },
            Mode::Viewing => self.view_key(key),
        }
    }

    fn edit_address(&mut self, key: Key) {
        match key {
            Key::Enter => {
                self.mode = Mode::Viewing;
                if self.address.is_empty() {
                    self.address = self.url.clone();
                    self.repaint_address_bar();
                } else {
                    let target = self.address.clone();
                    self.navigate(&target);
                }
                return;
            },
            Key::Escape => {
                self.mode = Mode::Viewing;
                self.address = self.url.clone();
            },
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = byte_index(&self.address, self.cursor);
                    self.address.remove(at);
                }
            },
            Key::Delete => {
                if self.cursor < self.address.chars().count() {
                    let at = byte_index(&self.address, self.cursor);
                    self.address.remove(at);
                }
            },
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(self.address.chars().count()),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.address.chars().count(),
            other => {
                let Some(ch) = other.printable() else {
                    return;
                };
                let at = byte_index(&self.address, self.cursor);
                self.address.insert(at, ch);
                self.cursor += 1;
            },
        }
        self.repaint_address_bar();
    }

    fn view_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => return false,
            Key::Up => self.scroll.line_up(),
            Key::Down => self.scroll.line_down(),
            Key::PageUp => self.scroll.page_up(),
            Key::PageDown => self.scroll.page_down(),
            Key::Home => self.scroll.scroll_to_top(),
            Key::End => self.scroll.scroll_to_bottom(),
            _ => return true,
        }
        self.repaint();
        true
    }

    // ---------------------------------------------------------------
    // Painting
    // ---------------------------------------------------------------

    /// Repaint the page, then the chrome over it.
    pub fn repaint(&mut self) {
        let cursor = self.edit_cursor();
        let result = paint::paint_content(
            &mut self.viewport,
            self.metrics.as_ref(),
            &self.layout,
            self.scroll.scroll_y,
            &self.config,
        )
        .and_then(|()| {
            chrome::paint_address_bar(&mut self.viewport, &self.address, cursor, &self.config)
        })
        .and_then(|()| chrome::paint_scrollbar(&mut self.viewport, &self.scroll, &self.config))
        .and_then(|()| self.viewport.invalidate());
        if let Err(e) = result {
            log::warn!("repaint: {e}");
        }
    }

    fn repaint_address_bar(&mut self) {
        let cursor = self.edit_cursor();
        let result =
            chrome::paint_address_bar(&mut self.viewport, &self.address, cursor, &self.config)
                .and_then(|()| self.viewport.invalidate());
        if let Err(e) = result {
            log::warn!("address bar: {e}");
        }
    }

    fn edit_cursor(&self) -> Option<usize> {
        (self.mode == Mode::EditingAddress).then_some(self.cursor)
    }

    // ---------------------------------------------------------------
    // Event loop
    // ---------------------------------------------------------------

    /// Load `initial_url` and process input until the window closes or
    /// Escape is pressed while viewing. The viewport is destroyed and
    /// returned.
    pub fn run(mut self, initial_url: &str) -> V {
        self.navigate(initial_url);

        loop {
            match self.viewport.poll_event() {
                Some(WindowEvent::Close) => break,
                Some(WindowEvent::MouseDown { x, y }) => self.handle_click(x, y),
                Some(WindowEvent::Key(key)) => {
                    if !self.handle_key(key) {
                        break;
                    }
                },
                None => std::thread::sleep(IDLE_POLL),
            }
            std::thread::yield_now();
        }

        log::info!("closing viewport");
        self.viewport.destroy();
        self.viewport
    }
}

/// Byte offset of character `index` in `s`, or `s.len()` past the end.
fn byte_index(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map_or(s.len(), |(i, _)| i)
}

/// Inline page shown for a failed fetch.
fn error_page(status: u16, message: &str) -> String {
    let mut html = format!("<html><body><h1>Error {status}</h1><p>");
    push_escaped(&mut html, message);
    html.push_str("</p></body></html>");
    html
}

/// Push HTML-escaped text into a string.
fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
