//! Browser configuration.
//!
//! Everything has a default, so an empty TOML document is a valid config.
//! Colors are stored as `#RRGGBB` strings and parsed on access, falling back
//! to the default when a value does not parse.

use serde::Deserialize;

use lumen_types::color::{Color, parse_hex_color};
use lumen_types::error::{LumenError, Result};

/// Fetch client tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Empty reads tolerated before giving up on a silent server.
    pub idle_limit: u32,
    /// Sleep between empty reads.
    pub idle_sleep_ms: u64,
    /// Largest response accepted, headers included.
    pub max_response_bytes: usize,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            idle_limit: 100,
            idle_sleep_ms: 50,
            max_response_bytes: 8 * 1024 * 1024,
            user_agent: format!("Lumen/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Page and chrome colors.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorScheme {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_text")]
    pub text: String,
    /// Image placeholders, scrollbar thumb, blockquote bar.
    #[serde(default = "default_muted")]
    pub muted: String,
    /// Address bar strip and buttons.
    #[serde(default = "default_chrome")]
    pub chrome: String,
    /// Address field background.
    #[serde(default = "default_field")]
    pub field: String,
    #[serde(default = "default_link")]
    pub link: String,
    /// Blockquote background.
    #[serde(default = "default_quote")]
    pub quote: String,
    /// Rules and table cell outlines.
    #[serde(default = "default_border")]
    pub border: String,
    #[serde(default = "default_scrollbar_track")]
    pub scrollbar_track: String,
}

fn default_background() -> String {
    "#FFFFFF".to_string()
}
fn default_text() -> String {
    "#000000".to_string()
}
fn default_muted() -> String {
    "#888888".to_string()
}
fn default_chrome() -> String {
    "#CCCCCC".to_string()
}
fn default_field() -> String {
    "#FFFFFF".to_string()
}
fn default_link() -> String {
    "#0000FF".to_string()
}
fn default_quote() -> String {
    "#EEEEEE".to_string()
}
fn default_border() -> String {
    "#000000".to_string()
}
fn default_scrollbar_track() -> String {
    "#DDDDDD".to_string()
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            background: default_background(),
            text: default_text(),
            muted: default_muted(),
            chrome: default_chrome(),
            field: default_field(),
            link: default_link(),
            quote: default_quote(),
            border: default_border(),
            scrollbar_track: default_scrollbar_track(),
        }
    }
}

fn color_or(hex: &str, fallback: fn() -> String) -> Color {
    parse_hex_color(hex)
        .or_else(|| parse_hex_color(&fallback()))
        .unwrap_or(Color::BLACK)
}

impl ColorScheme {
    pub fn background(&self) -> Color {
        color_or(&self.background, default_background)
    }
    pub fn text(&self) -> Color {
        color_or(&self.text, default_text)
    }
    pub fn muted(&self) -> Color {
        color_or(&self.muted, default_muted)
    }
    pub fn chrome(&self) -> Color {
        color_or(&self.chrome, default_chrome)
    }
    pub fn field(&self) -> Color {
        color_or(&self.field, default_field)
    }
    pub fn link(&self) -> Color {
        color_or(&self.link, default_link)
    }
    pub fn quote(&self) -> Color {
        color_or(&self.quote, default_quote)
    }
    pub fn border(&self) -> Color {
        color_or(&self.border, default_border)
    }
    pub fn scrollbar_track(&self) -> Color {
        color_or(&self.scrollbar_track, default_scrollbar_track)
    }
}

/// Geometry, fonts, limits and colors for one browser instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Page margin on every side of the content.
    pub margin: i32,
    pub scrollbar_width: u32,
    pub address_bar_height: u32,

    pub default_font_size: u16,
    /// Size used for `pre` / `code` blocks.
    pub pre_font_size: u16,
    /// `h1` through `h6`.
    pub heading_sizes: [u16; 6],

    /// Pixels per Up/Down key press.
    pub scroll_step: i32,
    pub max_redirects: usize,
    pub max_history: usize,
    pub home_url: String,

    pub fetch: FetchSettings,
    pub colors: ColorScheme,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            window_width: 640,
            window_height: 480,
            margin: 10,
            scrollbar_width: 12,
            address_bar_height: 24,
            default_font_size: 16,
            pre_font_size: 14,
            heading_sizes: [28, 24, 20, 18, 16, 14],
            scroll_step: 20,
            max_redirects: 10,
            max_history: 32,
            home_url: "about:home".to_string(),
            fetch: FetchSettings::default(),
            colors: ColorScheme::default(),
        }
    }
}

impl BrowserConfig {
    /// Parse a TOML document, filling gaps with defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(LumenError::Config("window size must be non-zero".to_string()));
        }
        if self.window_height <= self.address_bar_height + 2 {
            return Err(LumenError::Config(format!(
                "window height {} leaves no room below the address bar",
                self.window_height
            )));
        }
        if self.content_width() <= 0 {
            return Err(LumenError::Config(format!(
                "margin {} leaves no content width in a {} px window",
                self.margin, self.window_width
            )));
        }
        if self.default_font_size == 0
            || self.pre_font_size == 0
            || self.heading_sizes.contains(&0)
        {
            return Err(LumenError::Config("font sizes must be non-zero".to_string()));
        }
        if self.max_history == 0 {
            return Err(LumenError::Config("max_history must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Window y where page content starts.
    pub fn content_y(&self) -> i32 {
        self.address_bar_height as i32 + 2
    }

    /// Visible height of the page area.
    pub fn content_height(&self) -> i32 {
        self.window_height as i32 - self.content_y()
    }

    /// Width available to text, between the margins and left of the
    /// scrollbar.
    pub fn content_width(&self) -> i32 {
        self.window_width as i32 - 2 * self.margin - self.scrollbar_width as i32
    }
}
