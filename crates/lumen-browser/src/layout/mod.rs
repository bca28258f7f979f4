//! Layout engine: element tree to positioned paint primitives.
//!
//! A single top-down pass over the tree. The inherited state (font size,
//! style, link target, indent) travels down in a [`Cursor`]; the current y
//! is threaded through every call and returned. Output coordinates are in
//! document space: y grows down from the top of the page and does not
//! depend on scrolling.

pub mod block;
pub mod inline;
pub mod table;
pub mod text;

use lumen_types::backend::{StyleBits, TextMetrics};
use lumen_types::color::Color;

use crate::config::BrowserConfig;
use crate::html::Element;

// -------------------------------------------------------------------
// Output types
// -------------------------------------------------------------------

/// A positioned run of text on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub font_size: u16,
    pub style: StyleBits,
    pub color: Color,
    /// Link target when the run is part of a link.
    pub href: Option<String>,
    /// Measured width of `text`.
    pub width: i32,
    /// Line height at `font_size`.
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Filled blockquote background.
    Background,
    /// Outlined table cell.
    Border,
}

/// Something the painter draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintPrimitive {
    TextRun(TextRun),
    /// One-pixel horizontal line.
    Rule { x: i32, y: i32, w: i32, color: Color },
    Panel {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Color,
        kind: PanelKind,
    },
}

impl PaintPrimitive {
    /// Top edge in document space.
    pub fn y(&self) -> i32 {
        match self {
            Self::TextRun(run) => run.y,
            Self::Rule { y, .. } | Self::Panel { y, .. } => *y,
        }
    }

    /// Vertical extent.
    pub fn height(&self) -> i32 {
        match self {
            Self::TextRun(run) => run.height,
            Self::Rule { .. } => 1,
            Self::Panel { h, .. } => *h,
        }
    }
}

/// A clickable rectangle in document space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRegion {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub href: String,
}

impl LinkRegion {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// Result of laying out one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutResult {
    /// Primitives in paint order.
    pub blocks: Vec<PaintPrimitive>,
    /// Link regions in layout order.
    pub links: Vec<LinkRegion>,
    pub total_height: i32,
}

impl LayoutResult {
    /// Iterate over the text runs only.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.blocks.iter().filter_map(|b| match b {
            PaintPrimitive::TextRun(run) => Some(run),
            _ => None,
        })
    }

    /// First link region containing the document-space point.
    pub fn link_at(&self, x: i32, y: i32) -> Option<&LinkRegion> {
        self.links.iter().find(|l| l.contains(x, y))
    }
}

// -------------------------------------------------------------------
// Parameters
// -------------------------------------------------------------------

/// Geometry, font sizes and colors used by layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutParams {
    pub margin: i32,
    /// Width available to text, starting at `margin`.
    pub content_width: i32,
    pub font_size: u16,
    pub pre_font_size: u16,
    pub heading_sizes: [u16; 6],
    pub text_color: Color,
    pub link_color: Color,
    pub muted_color: Color,
    pub quote_color: Color,
    pub border_color: Color,
}

impl LayoutParams {
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            margin: config.margin,
            content_width: config.content_width(),
            font_size: config.default_font_size,
            pre_font_size: config.pre_font_size,
            heading_sizes: config.heading_sizes,
            text_color: config.colors.text(),
            link_color: config.colors.link(),
            muted_color: config.colors.muted(),
            quote_color: config.colors.quote(),
            border_color: config.colors.border(),
        }
    }

    pub fn heading_size(&self, level: usize) -> u16 {
        level
            .checked_sub(1)
            .and_then(|i| self.heading_sizes.get(i))
            .copied()
            .unwrap_or(self.font_size)
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::from_config(&BrowserConfig::default())
    }
}

// -------------------------------------------------------------------
// Layout state
// -------------------------------------------------------------------

/// Inherited state passed down the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub font_size: u16,
    pub style: StyleBits,
    pub href: Option<String>,
    /// Left indent relative to the margin.
    pub indent: i32,
}

impl Cursor {
    pub fn new(font_size: u16) -> Self {
        Self {
            font_size,
            style: StyleBits::NONE,
            href: None,
            indent: 0,
        }
    }

    /// Copy of this cursor adjusted for entering `el`: bold for `b` /
    /// `strong`, italic for `i` / `em`, link target for `a`.
    pub fn enter(&self, el: &Element) -> Self {
        let mut next = self.clone();
        match el.tag.as_str() {
            "b" | "strong" => next.style = next.style | StyleBits::BOLD,
            "i" | "em" => next.style = next.style | StyleBits::ITALIC,
            "a" => {
                next.href = el
                    .attr("href")
                    .filter(|h| !h.is_empty())
                    .map(str::to_string);
            },
            _ => {},
        }
        next
    }

    pub fn with_indent(&self, extra: i32) -> Self {
        Self {
            indent: self.indent + extra,
            ..self.clone()
        }
    }
}

/// Mutable state shared by the whole pass.
pub struct LayoutContext<'a> {
    pub metrics: &'a dyn TextMetrics,
    pub params: &'a LayoutParams,
    pub blocks: Vec<PaintPrimitive>,
    pub links: Vec<LinkRegion>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(metrics: &'a dyn TextMetrics, params: &'a LayoutParams) -> Self {
        Self {
            metrics,
            params,
            blocks: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn line_height(&self, font_size: u16) -> i32 {
        self.metrics.line_metrics(font_size).line_height()
    }

    pub fn measure(&self, text: &str, font_size: u16) -> i32 {
        self.metrics.measure(text, font_size)
    }

    /// Left edge of a line at `indent`.
    pub fn line_start(&self, indent: i32) -> i32 {
        self.params.margin + indent
    }

    /// Right edge lines may not cross.
    pub fn line_end(&self) -> i32 {
        self.params.margin + self.params.content_width
    }

    /// Text color for a run under `cursor`.
    pub fn text_color(&self, cursor: &Cursor) -> Color {
        if cursor.href.is_some() {
            self.params.link_color
        } else {
            self.params.text_color
        }
    }

    /// Append a text run and, when `cursor` carries a link, its link
    /// region. Returns the run's width.
    pub fn push_run(&mut self, x: i32, y: i32, text: String, cursor: &Cursor, color: Color) -> i32 {
        let width = self.measure(&text, cursor.font_size);
        let height = self.line_height(cursor.font_size);
        if let Some(href) = &cursor.href {
            self.links.push(LinkRegion {
                x,
                y,
                w: width,
                h: height,
                href: href.clone(),
            });
        }
        self.blocks.push(PaintPrimitive::TextRun(TextRun {
            x,
            y,
            text,
            font_size: cursor.font_size,
            style: cursor.style,
            color,
            href: cursor.href.clone(),
            width,
            height,
        }));
        width
    }

    fn finish(self, total_height: i32) -> LayoutResult {
        LayoutResult {
            blocks: self.blocks,
            links: self.links,
            total_height,
        }
    }
}

// -------------------------------------------------------------------
// Entry point
// -------------------------------------------------------------------

/// Lay out the document under `root`.
///
/// Starts from the first `body` element, or from `root` itself when there
/// is none.
pub fn layout(root: &Element, metrics: &dyn TextMetrics, params: &LayoutParams) -> LayoutResult {
    let body = root.find("body").unwrap_or(root);
    let mut ctx = LayoutContext::new(metrics, params);
    let cursor = Cursor::new(params.font_size);
    let y = block::layout_element(&mut ctx, body, &cursor, params.margin);
    ctx.finish(y + params.margin)
}
