//! Foundation types and traits for the Lumen browser.
//!
//! This crate holds the platform-agnostic pieces shared by every Lumen crate:
//! colors, window input events, the host trait definitions the engine paints
//! and measures through, the embedded bitmap font, and the error type.

pub mod backend;
pub mod bitmap_font;
pub mod color;
pub mod error;
pub mod framebuffer;
pub mod input;
