//! Table layout: equal-width columns, one line per row.

use lumen_types::backend::StyleBits;

use super::text::truncate_to_width;
use super::{Cursor, LayoutContext, PaintPrimitive, PanelKind};
use crate::html::Element;

/// Padding between a cell border and its text.
const CELL_PADDING: i32 = 4;

struct Cell {
    header: bool,
    text: String,
}

/// Rows of `table`, taken from direct `tr` children and from `tr` children
/// of `thead` / `tbody` / `tfoot`. Rows without cells are dropped.
fn collect_rows(table: &Element) -> Vec<Vec<Cell>> {
    let mut rows = Vec::new();
    for child in &table.children {
        match child.tag.as_str() {
            "tr" => push_row(child, &mut rows),
            "thead" | "tbody" | "tfoot" => {
                for tr in child.children.iter().filter(|c| c.tag == "tr") {
                    push_row(tr, &mut rows);
                }
            },
            _ => {},
        }
    }
    rows
}

fn push_row(tr: &Element, rows: &mut Vec<Vec<Cell>>) {
    let cells: Vec<Cell> = tr
        .children
        .iter()
        .filter(|c| c.tag == "td" || c.tag == "th")
        .map(|c| Cell {
            header: c.tag == "th",
            text: c.all_text(),
        })
        .collect();
    if !cells.is_empty() {
        rows.push(cells);
    }
}

/// Lay out `table` as a grid of bordered cells; returns the y below it.
pub fn layout_table(ctx: &mut LayoutContext<'_>, table: &Element, cursor: &Cursor, y: i32) -> i32 {
    let rows = collect_rows(table);
    let Some(cols) = rows.iter().map(Vec::len).max() else {
        return y;
    };

    let left = ctx.line_start(cursor.indent);
    let col_width = (ctx.params.content_width - cursor.indent) / cols as i32;
    let row_height = ctx.line_height(cursor.font_size) + 2 * CELL_PADDING;
    let text_color = ctx.params.text_color;
    // Cell text is never clickable.
    let plain = Cursor {
        href: None,
        ..cursor.clone()
    };
    let bold = Cursor {
        style: plain.style | StyleBits::BOLD,
        ..plain.clone()
    };

    let mut y = y + 4;
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            let cell_x = left + i as i32 * col_width;
            ctx.blocks.push(PaintPrimitive::Panel {
                x: cell_x,
                y,
                w: col_width,
                h: row_height,
                color: ctx.params.border_color,
                kind: PanelKind::Border,
            });

            let cell_cursor = if cell.header { &bold } else { &plain };
            let text = truncate_to_width(
                ctx.metrics,
                &cell.text,
                cell_cursor.font_size,
                col_width - 2 * CELL_PADDING,
            );
            if !text.is_empty() {
                ctx.push_run(
                    cell_x + CELL_PADDING,
                    y + CELL_PADDING,
                    text,
                    cell_cursor,
                    text_color,
                );
            }
        }
        y += row_height;
    }
    y + 4
}
