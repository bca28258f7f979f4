//! Per-element block layout.

use lumen_types::backend::StyleBits;

use super::inline::layout_inline;
use super::table::layout_table;
use super::text::layout_text;
use super::{Cursor, LayoutContext, PaintPrimitive, PanelKind};
use crate::html::Element;

/// Elements that never produce output.
fn is_hidden(tag: &str) -> bool {
    matches!(tag, "head" | "title" | "script" | "style" | "meta" | "link")
}

/// Placeholder text for an image.
pub fn image_placeholder(el: &Element) -> String {
    match el.attr("alt").map(str::trim) {
        Some(alt) if !alt.is_empty() => format!("[{alt}]"),
        _ => "[image]".to_string(),
    }
}

/// Lay out `el` starting at `y`; returns the y below it.
pub fn layout_element(ctx: &mut LayoutContext<'_>, el: &Element, cursor: &Cursor, y: i32) -> i32 {
    let tag = el.tag.as_str();
    if is_hidden(tag) {
        return y;
    }
    let cursor = cursor.enter(el);

    if let Some(level) = el.heading_level() {
        return layout_heading(ctx, el, &cursor, level, y);
    }

    match tag {
        "p" => {
            let quarter = ctx.line_height(cursor.font_size) / 4;
            let y = layout_inline(ctx, el, &cursor, y + quarter);
            y + quarter
        },
        "br" => y + ctx.line_height(cursor.font_size),
        "hr" => {
            ctx.blocks.push(PaintPrimitive::Rule {
                x: ctx.line_start(cursor.indent),
                y: y + 4,
                w: ctx.params.content_width - cursor.indent,
                color: ctx.params.muted_color,
            });
            y + 8
        },
        "ul" | "ol" => layout_list(ctx, el, &cursor, tag == "ol", y),
        "blockquote" => layout_blockquote(ctx, el, &cursor, y),
        "pre" => {
            let mut text = String::new();
            collect_preformatted(el, &mut text);
            layout_preformatted(ctx, &text, &cursor, y)
        },
        "code" => layout_preformatted(ctx, &el.all_text(), &cursor, y),
        "table" => layout_table(ctx, el, &cursor, y),
        "img" => {
            let color = ctx.params.muted_color;
            layout_text(ctx, &image_placeholder(el), &cursor, color, y)
        },
        _ => {
            let mut y = y;
            if !el.text.is_empty() {
                let color = ctx.text_color(&cursor);
                y = layout_text(ctx, &el.text, &cursor, color, y);
            }
            for child in &el.children {
                y = layout_element(ctx, child, &cursor, y);
            }
            y
        },
    }
}

fn layout_heading(
    ctx: &mut LayoutContext<'_>,
    el: &Element,
    cursor: &Cursor,
    level: usize,
    y: i32,
) -> i32 {
    let cursor = Cursor {
        font_size: ctx.params.heading_size(level),
        style: cursor.style | StyleBits::BOLD,
        ..cursor.clone()
    };
    let half = ctx.line_height(cursor.font_size) / 2;
    let color = ctx.text_color(&cursor);
    let y = layout_text(ctx, &el.all_text(), &cursor, color, y + half);
    y + half
}

fn layout_list(
    ctx: &mut LayoutContext<'_>,
    list: &Element,
    cursor: &Cursor,
    ordered: bool,
    y: i32,
) -> i32 {
    let mut y = y + 4;
    let line_height = ctx.line_height(cursor.font_size);
    let bullet_cursor = Cursor {
        href: None,
        ..cursor.clone()
    };
    let item_cursor = cursor.with_indent(40);

    for (n, item) in list.children.iter().filter(|c| c.tag == "li").enumerate() {
        let bullet = if ordered {
            format!("{}.", n + 1)
        } else {
            "*".to_string()
        };
        let bullet_x = ctx.line_start(cursor.indent + 20);
        let text_color = ctx.params.text_color;
        ctx.push_run(bullet_x, y, bullet, &bullet_cursor, text_color);

        let start = y;
        for child in &item.children {
            y = layout_element(ctx, child, &item_cursor, y);
        }
        if !item.text.is_empty() {
            let color = ctx.text_color(&item_cursor);
            y = layout_text(ctx, &item.text, &item_cursor, color, y);
        }
        if y == start {
            y += line_height;
        }
    }
    y + 4
}

fn layout_blockquote(ctx: &mut LayoutContext<'_>, el: &Element, cursor: &Cursor, y: i32) -> i32 {
    let top = y + 8;
    let panel = ctx.blocks.len();
    ctx.blocks.push(PaintPrimitive::Panel {
        x: ctx.line_start(cursor.indent),
        y: top,
        w: ctx.params.content_width - cursor.indent,
        h: 0,
        color: ctx.params.quote_color,
        kind: PanelKind::Background,
    });

    let inner = Cursor {
        style: cursor.style | StyleBits::ITALIC,
        ..cursor.with_indent(20)
    };
    let color = ctx.text_color(&inner);
    let bottom = layout_text(ctx, &el.all_text(), &inner, color, top);

    if let Some(PaintPrimitive::Panel { h, .. }) = ctx.blocks.get_mut(panel) {
        *h = bottom - top + 8;
    }
    bottom + 8
}

/// Concatenate the text of `el` and its descendants without separators.
fn collect_preformatted(el: &Element, out: &mut String) {
    out.push_str(&el.text);
    for child in &el.children {
        collect_preformatted(child, out);
    }
}

/// One unwrapped run per source line at the preformatted size.
fn layout_preformatted(ctx: &mut LayoutContext<'_>, text: &str, cursor: &Cursor, y: i32) -> i32 {
    let cursor = Cursor {
        font_size: ctx.params.pre_font_size,
        style: StyleBits::NONE,
        ..cursor.clone()
    };
    let line_height = ctx.line_height(cursor.font_size);
    let x = ctx.line_start(cursor.indent);
    let color = ctx.text_color(&cursor);

    let mut y = y + 4;
    for line in text.trim_end_matches('\n').split('\n') {
        let line = line.replace('\t', "    ");
        let line = line.trim_end();
        if !line.is_empty() {
            ctx.push_run(x, y, line.to_string(), &cursor, color);
        }
        y += line_height;
    }
    y + 4
}
