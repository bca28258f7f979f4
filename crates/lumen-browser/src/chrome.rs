//! Browser chrome: the address-bar strip and the scrollbar.
//!
//! The strip across the top holds a back button, a refresh button and the
//! address field. Chrome text always uses the viewport's builtin 8 px font,
//! so the address cursor can be placed by character count.

use lumen_types::backend::Viewport;
use lumen_types::error::Result;

use crate::config::BrowserConfig;
use crate::scroll::ScrollState;

/// Builtin font advance.
const CHAR_WIDTH: i32 = 8;

const BUTTON_SIZE: i32 = 16;
const BUTTON_TOP: i32 = 4;
const BACK_X: i32 = 4;
const REFRESH_X: i32 = 24;
/// Left edge of the address field.
pub const ADDRESS_X: i32 = 44;
/// Where address text starts.
const ADDRESS_TEXT_X: i32 = 48;
/// Address text longer than this is cut and gets `...`.
const MAX_ADDRESS_CHARS: usize = 68;

const MIN_THUMB_HEIGHT: i32 = 20;

/// What a click in window coordinates landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeHit {
    Back,
    Refresh,
    /// The address field.
    Address,
    /// Elsewhere in the strip.
    Strip,
    /// The page area below the strip.
    Content,
}

fn in_button(x: i32, y: i32, left: i32) -> bool {
    (left..left + BUTTON_SIZE).contains(&x) && (BUTTON_TOP..BUTTON_TOP + BUTTON_SIZE).contains(&y)
}

/// Classify a click. Buttons win over everything else in the strip.
pub fn hit_test(x: i32, y: i32, bar_height: i32) -> ChromeHit {
    if y >= bar_height {
        return ChromeHit::Content;
    }
    if in_button(x, y, BACK_X) {
        ChromeHit::Back
    } else if in_button(x, y, REFRESH_X) {
        ChromeHit::Refresh
    } else if x >= ADDRESS_X {
        ChromeHit::Address
    } else {
        ChromeHit::Strip
    }
}

/// Address text as shown in the field.
pub fn display_address(text: &str) -> String {
    if text.chars().count() > MAX_ADDRESS_CHARS {
        let mut shown: String = text.chars().take(MAX_ADDRESS_CHARS).collect();
        shown.push_str("...");
        shown
    } else {
        text.to_string()
    }
}

/// Paint the strip. `cursor` is the edit cursor (in characters) while the
/// address is being edited.
pub fn paint_address_bar(
    vp: &mut dyn Viewport,
    address: &str,
    cursor: Option<usize>,
    config: &BrowserConfig,
) -> Result<()> {
    let colors = &config.colors;
    let width = config.window_width;
    let button = BUTTON_SIZE as u32;

    vp.fill_rect(0, 0, width, config.address_bar_height, colors.chrome())?;

    for (left, label) in [(BACK_X, "<"), (REFRESH_X, "O")] {
        vp.fill_rect(left, BUTTON_TOP, button, button, colors.field())?;
        vp.draw_rect(left, BUTTON_TOP, button, button, colors.border())?;
        vp.draw_string(left + 2, BUTTON_TOP, label, colors.text())?;
    }

    let field_width = width.saturating_sub(ADDRESS_X as u32 + 4);
    vp.fill_rect(ADDRESS_X, BUTTON_TOP, field_width, button, colors.field())?;
    vp.draw_rect(ADDRESS_X, BUTTON_TOP, field_width, button, colors.border())?;
    vp.draw_string(ADDRESS_TEXT_X, BUTTON_TOP, &display_address(address), colors.text())?;

    if let Some(cursor) = cursor {
        let field_end = ADDRESS_X + field_width as i32 - 2;
        let x = (ADDRESS_TEXT_X + cursor as i32 * CHAR_WIDTH).min(field_end);
        vp.fill_rect(x, BUTTON_TOP + 2, 1, 12, colors.text())?;
    }
    Ok(())
}

/// Paint the scrollbar track and thumb along the right edge of the page
/// area. Nothing is drawn when the page fits.
pub fn paint_scrollbar(
    vp: &mut dyn Viewport,
    scroll: &ScrollState,
    config: &BrowserConfig,
) -> Result<()> {
    let track = config.content_height();
    let Some((offset, thumb)) = scroll.thumb(track, MIN_THUMB_HEIGHT) else {
        return Ok(());
    };
    let top = config.content_y();
    let bar_x = config.window_width as i32 - config.scrollbar_width as i32;
    let colors = &config.colors;

    vp.fill_rect(bar_x, top, config.scrollbar_width, track as u32, colors.scrollbar_track())?;
    vp.fill_rect(
        bar_x + 2,
        top + offset,
        config.scrollbar_width.saturating_sub(4),
        thumb as u32,
        colors.muted(),
    )
}
