//! Inline flow for paragraph content.
//!
//! The paragraph's own text and the text of every nested element are each
//! flowed as a separate run set: words of one element share runs, but a
//! run never spans two elements, so each run keeps the style and link
//! target of the element it came from. The pen position carries over from
//! one element to the next.

use lumen_types::color::Color;

use super::block::image_placeholder;
use super::{Cursor, LayoutContext};
use crate::html::Element;

struct InlineFlow {
    /// Left edge of every line.
    line_start: i32,
    /// Pen position on the current line.
    x: i32,
    y: i32,
    line_height: i32,
    /// Something has been placed on the current line.
    line_used: bool,
}

impl InlineFlow {
    fn new_line(&mut self) {
        self.x = self.line_start;
        self.y += self.line_height;
        self.line_used = false;
    }
}

/// Flow the content of `el` as wrapped lines; returns the y below the
/// last line.
pub fn layout_inline(ctx: &mut LayoutContext<'_>, el: &Element, cursor: &Cursor, y: i32) -> i32 {
    let line_start = ctx.line_start(cursor.indent);
    let mut flow = InlineFlow {
        line_start,
        x: line_start,
        y,
        line_height: ctx.line_height(cursor.font_size),
        line_used: false,
    };
    flow_element(ctx, &mut flow, el, cursor);
    if flow.line_used {
        flow.y + flow.line_height
    } else {
        flow.y
    }
}

fn flow_element(ctx: &mut LayoutContext<'_>, flow: &mut InlineFlow, el: &Element, cursor: &Cursor) {
    let color = ctx.text_color(cursor);
    flow_words(ctx, flow, &el.text, cursor, color);

    for child in &el.children {
        match child.tag.as_str() {
            "br" => flow.new_line(),
            "img" => {
                let color = ctx.params.muted_color;
                flow_words(ctx, flow, &image_placeholder(child), cursor, color);
            },
            "script" | "style" => {},
            _ => flow_element(ctx, flow, child, &cursor.enter(child)),
        }
    }
}

/// Place the words of one element, emitting a run each time the line
/// fills up and once more at the end.
fn flow_words(
    ctx: &mut LayoutContext<'_>,
    flow: &mut InlineFlow,
    text: &str,
    cursor: &Cursor,
    color: Color,
) {
    let max_x = ctx.line_end();
    let mut line = String::new();
    let mut run_x = flow.x;

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        let overflows = run_x + ctx.measure(&candidate, cursor.font_size) > max_x;

        if overflows && !line.is_empty() {
            ctx.push_run(run_x, flow.y, std::mem::take(&mut line), cursor, color);
            flow.new_line();
            run_x = flow.x;
            line.push_str(word);
        } else if overflows && run_x > flow.line_start {
            // The previous element filled this line.
            flow.new_line();
            run_x = flow.x;
            line.push_str(word);
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        let width = ctx.push_run(run_x, flow.y, line, cursor, color);
        flow.x = run_x + width + ctx.measure(" ", cursor.font_size);
        flow.line_used = true;
    }
}
