//! Painting laid-out pages onto a [`Viewport`].
//!
//! Paint primitives are in document space; the painter shifts them by the
//! scroll offset and the height of the chrome strip, and skips anything
//! that falls entirely outside the window.

use lumen_types::backend::{StyleBits, TextMetrics, Viewport};
use lumen_types::color::Color;
use lumen_types::error::Result;

use crate::config::BrowserConfig;
use crate::layout::{LayoutResult, PaintPrimitive, PanelKind, TextRun};

/// Width of the bar on the left edge of a blockquote.
const QUOTE_BAR_WIDTH: u32 = 3;

/// Gap between a link's top edge and its underline, below the ascent.
const UNDERLINE_GAP: i32 = 2;

/// Paint the page area: clear it, then draw every visible primitive.
pub fn paint_content(
    vp: &mut dyn Viewport,
    metrics: &dyn TextMetrics,
    page: &LayoutResult,
    scroll_y: i32,
    config: &BrowserConfig,
) -> Result<()> {
    let top = config.content_y();
    let bottom = config.window_height as i32;
    vp.fill_rect(
        0,
        top,
        config.window_width,
        config.content_height().max(0) as u32,
        config.colors.background(),
    )?;

    for block in &page.blocks {
        let sy = block.y() - scroll_y + top;
        if sy + block.height() <= top || sy >= bottom {
            continue;
        }
        match block {
            PaintPrimitive::TextRun(run) => paint_run(vp, metrics, run, sy, config)?,
            PaintPrimitive::Rule { x, w, color, .. } => {
                vp.draw_hline(*x, sy, (*w).max(0) as u32, *color)?;
            },
            PaintPrimitive::Panel {
                x,
                w,
                h,
                color,
                kind,
                ..
            } => {
                let (w, h) = ((*w).max(0) as u32, (*h).max(0) as u32);
                match kind {
                    PanelKind::Background => {
                        vp.fill_rect(*x, sy, w, h, *color)?;
                        vp.fill_rect(*x, sy, QUOTE_BAR_WIDTH.min(w), h, config.colors.muted())?;
                    },
                    PanelKind::Border => vp.draw_rect(*x, sy, w, h, *color)?,
                }
            },
        }
    }
    Ok(())
}

fn paint_run(
    vp: &mut dyn Viewport,
    metrics: &dyn TextMetrics,
    run: &TextRun,
    sy: i32,
    config: &BrowserConfig,
) -> Result<()> {
    render_text(vp, metrics, run.x, sy, &run.text, run.font_size, run.style, run.color)?;
    if run.href.is_some() {
        let ascent = metrics.line_metrics(run.font_size).ascent;
        vp.draw_hline(
            run.x,
            sy + ascent + UNDERLINE_GAP,
            run.width.max(0) as u32,
            config.colors.link(),
        )?;
    }
    Ok(())
}

/// Draw `text` with its top-left corner at `(x, y)`.
///
/// Glyphs are placed on the baseline at `y + ascent`, advancing the pen by
/// each glyph's advance plus pair kerning. When the metrics cannot
/// rasterize, the whole string goes through the viewport's builtin font.
#[allow(clippy::too_many_arguments)]
pub fn render_text(
    vp: &mut dyn Viewport,
    metrics: &dyn TextMetrics,
    x: i32,
    y: i32,
    text: &str,
    size: u16,
    style: StyleBits,
    color: Color,
) -> Result<()> {
    if !metrics.is_ready() {
        return vp.draw_string(x, y, text, color);
    }

    let baseline = y + metrics.line_metrics(size).ascent;
    let mut pen = x;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if let Some(p) = prev {
            pen += metrics.kerning(p, ch, size);
        }
        if !ch.is_whitespace()
            && let Some(glyph) = metrics.glyph(ch, size, style)
            && !glyph.coverage.is_empty()
        {
            vp.draw_glyph(pen + glyph.bearing_x, baseline - glyph.bearing_y, &glyph, color)?;
        }
        pen += metrics.advance(ch, size);
        prev = Some(ch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html;
    use crate::layout::{LayoutParams, layout};
    use crate::test_utils::{DrawCall, FixedMetrics, MockViewport};
    use lumen_types::bitmap_font::BitmapTextMetrics;

    fn page(src: &str, config: &BrowserConfig) -> LayoutResult {
        layout(&html::parse(src), &FixedMetrics, &LayoutParams::from_config(config))
    }

    #[test]
    fn clears_content_area_first() {
        let config = BrowserConfig::default();
        let mut vp = MockViewport::new(640, 480);
        paint_content(&mut vp, &FixedMetrics, &LayoutResult::default(), 0, &config).unwrap();
        assert_eq!(
            vp.calls,
            [DrawCall::FillRect {
                x: 0,
                y: 26,
                w: 640,
                h: 454,
                color: Color::WHITE,
            }]
        );
    }

    #[test]
    fn text_is_offset_by_chrome_and_scroll() {
        let config = BrowserConfig::default();
        let r = page("<body>hello</body>", &config);
        let mut vp = MockViewport::new(640, 480);
        paint_content(&mut vp, &FixedMetrics, &r, 0, &config).unwrap();
        assert_eq!(vp.text_position("hello"), Some((10, 10 + 26)));

        vp.clear();
        paint_content(&mut vp, &FixedMetrics, &r, 5, &config).unwrap();
        assert_eq!(vp.text_position("hello"), Some((10, 5 + 26)));
    }

    #[test]
    fn offscreen_blocks_are_culled() {
        let config = BrowserConfig::default();
        let src = format!("<body><p>first</p><pre>{}last</pre></body>", "\n".repeat(25));
        let r = page(&src, &config);
        let mut vp = MockViewport::new(640, 480);
        paint_content(&mut vp, &FixedMetrics, &r, 0, &config).unwrap();
        assert!(vp.has_text("first"));
        assert!(!vp.has_text("last"));

        vp.clear();
        paint_content(&mut vp, &FixedMetrics, &r, 200, &config).unwrap();
        assert!(!vp.has_text("first"));
        assert!(vp.has_text("last"));
    }

    #[test]
    fn links_are_underlined() {
        let config = BrowserConfig::default();
        let r = page("<body><a href=\"/x\">link</a></body>", &config);
        let mut vp = MockViewport::new(640, 480);
        paint_content(&mut vp, &FixedMetrics, &r, 0, &config).unwrap();
        assert_eq!(vp.hline_count(), 1);
        let underline = vp
            .calls
            .iter()
            .find(|c| matches!(c, DrawCall::HLine { .. }))
            .unwrap();
        assert_eq!(
            *underline,
            DrawCall::HLine {
                x: 10,
                y: 36 + FixedMetrics::ASCENT + 2,
                w: 32,
                color: config.colors.link(),
            }
        );
    }

    #[test]
    fn blockquote_has_background_and_bar() {
        let config = BrowserConfig::default();
        let r = page("<blockquote>quoted</blockquote>", &config);
        let mut vp = MockViewport::new(640, 480);
        paint_content(&mut vp, &FixedMetrics, &r, 0, &config).unwrap();
        let fills: Vec<_> = vp
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillRect { w, color, .. } => Some((*w, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 3);
        assert_eq!(fills[1].1, config.colors.quote());
        assert_eq!(fills[2], (3, config.colors.muted()));
    }

    #[test]
    fn table_cells_are_outlined() {
        let config = BrowserConfig::default();
        let r = page("<table><tr><td>a</td><td>b</td></tr></table>", &config);
        let mut vp = MockViewport::new(640, 480);
        paint_content(&mut vp, &FixedMetrics, &r, 0, &config).unwrap();
        let outlines = vp
            .calls
            .iter()
            .filter(|c| matches!(c, DrawCall::DrawRect { color, .. } if *color == Color::BLACK))
            .count();
        assert_eq!(outlines, 2);
    }

    #[test]
    fn ready_metrics_draw_glyphs() {
        let mut vp = MockViewport::new(640, 480);
        let metrics = BitmapTextMetrics::new();
        render_text(&mut vp, &metrics, 0, 0, "a b", 16, StyleBits::NONE, Color::BLACK).unwrap();
        // The space advances without drawing.
        assert_eq!(vp.glyph_count(), 2);
        let xs: Vec<i32> = vp
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Glyph { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, [0, 32]);
        assert!(vp.texts().is_empty());
    }

    #[test]
    fn unready_metrics_fall_back_to_builtin_font() {
        let mut vp = MockViewport::new(640, 480);
        render_text(&mut vp, &FixedMetrics, 3, 4, "abc", 16, StyleBits::BOLD, Color::BLACK)
            .unwrap();
        assert_eq!(
            vp.calls,
            [DrawCall::Text {
                x: 3,
                y: 4,
                text: "abc".into(),
                color: Color::BLACK,
            }]
        );
    }
}
