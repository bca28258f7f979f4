//! Window input events.
//!
//! Every viewport maps its native input to these enums. The browser never
//! sees raw platform input.

/// An event delivered by [`Viewport::poll_event`](crate::backend::Viewport::poll_event).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The user asked to close the window.
    Close,
    /// Mouse button pressed at a window-relative position.
    MouseDown { x: i32, y: i32 },
    /// A key was pressed.
    Key(Key),
}

/// Keys the browser reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// A printable ASCII character (`' '..='~'`).
    Char(char),
    /// Anything else, carrying the raw host key code.
    Other(u32),
}

// Host key codes for the non-ASCII keys.
const CODE_UP: u32 = 0x100;
const CODE_DOWN: u32 = 0x101;
const CODE_LEFT: u32 = 0x102;
const CODE_RIGHT: u32 = 0x103;
const CODE_HOME: u32 = 0x104;
const CODE_END: u32 = 0x105;
const CODE_DELETE: u32 = 0x106;
const CODE_PAGE_UP: u32 = 0x109;
const CODE_PAGE_DOWN: u32 = 0x10A;

impl Key {
    /// Decode a host keyboard code.
    ///
    /// Enter arrives as either CR or LF, Backspace as either BS or DEL.
    pub fn from_code(code: u32) -> Self {
        match code {
            13 | 10 => Self::Enter,
            27 => Self::Escape,
            8 | 127 => Self::Backspace,
            32..=126 => char::from_u32(code).map_or(Self::Other(code), Self::Char),
            CODE_UP => Self::Up,
            CODE_DOWN => Self::Down,
            CODE_LEFT => Self::Left,
            CODE_RIGHT => Self::Right,
            CODE_HOME => Self::Home,
            CODE_END => Self::End,
            CODE_DELETE => Self::Delete,
            CODE_PAGE_UP => Self::PageUp,
            CODE_PAGE_DOWN => Self::PageDown,
            other => Self::Other(other),
        }
    }

    /// The printable character for this key, if any.
    pub fn printable(self) -> Option<char> {
        match self {
            Self::Char(c) if (' '..='~').contains(&c) => Some(c),
            _ => None,
        }
    }
}
