//! Word-wrapped text blocks and width-limited truncation.

use lumen_types::backend::TextMetrics;
use lumen_types::color::Color;

use super::{Cursor, LayoutContext};

/// Lay out `text` as a word-wrapped block starting at the left edge of
/// `cursor.indent`. Each output line is one text run. Returns the y below
/// the last line, or `y` unchanged when `text` has no words.
///
/// A line is extended word by word while the joined line still fits; a
/// word too wide for an empty line gets a line of its own.
pub fn layout_text(
    ctx: &mut LayoutContext<'_>,
    text: &str,
    cursor: &Cursor,
    color: Color,
    y: i32,
) -> i32 {
    let x = ctx.line_start(cursor.indent);
    let max_x = ctx.line_end();
    let line_height = ctx.line_height(cursor.font_size);

    let mut y = y;
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if x + ctx.measure(&candidate, cursor.font_size) > max_x {
            ctx.push_run(x, y, std::mem::take(&mut line), cursor, color);
            y += line_height;
            line.push_str(word);
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        ctx.push_run(x, y, line, cursor, color);
        y += line_height;
    }
    y
}

/// Longest prefix of `text` whose measured width fits in `max_width`.
pub fn truncate_to_width(
    metrics: &dyn TextMetrics,
    text: &str,
    size: u16,
    max_width: i32,
) -> String {
    if metrics.measure(text, size) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if metrics.measure(&out, size) > max_width {
            out.pop();
            break;
        }
    }
    out
}
