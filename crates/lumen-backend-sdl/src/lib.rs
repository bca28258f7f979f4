//! SDL2 viewport for Lumen.
//!
//! Drawing goes into a software [`Framebuffer`]; `invalidate` uploads the
//! whole frame to a streaming texture and presents it. Keeping the frame in
//! memory lets the browser repaint only the parts that changed.

use sdl2::EventPump;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::Canvas;
use sdl2::video::Window;

use lumen_types::backend::{Glyph, Viewport};
use lumen_types::color::Color;
use lumen_types::error::{LumenError, Result};
use lumen_types::framebuffer::Framebuffer;
use lumen_types::input::{Key, WindowEvent};

/// A desktop window backed by SDL2.
pub struct SdlViewport {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    frame: Framebuffer,
}

fn backend_err(e: impl ToString) -> LumenError {
    LumenError::Backend(e.to_string())
}

impl SdlViewport {
    /// Open a centered window of the given size.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl = sdl2::init().map_err(backend_err)?;
        let video = sdl.video().map_err(backend_err)?;
        let window = video
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(backend_err)?;
        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(backend_err)?;
        let event_pump = sdl.event_pump().map_err(backend_err)?;
        video.text_input().start();

        log::info!("SDL2 viewport initialized: {width}x{height}");

        Ok(Self {
            canvas,
            event_pump,
            frame: Framebuffer::new(width, height),
        })
    }

    fn present(&mut self) -> Result<()> {
        let (width, height) = (self.frame.width(), self.frame.height());
        let creator = self.canvas.texture_creator();
        let mut texture = creator
            .create_texture_streaming(PixelFormatEnum::ABGR8888, width, height)
            .map_err(backend_err)?;
        let row_bytes = (width * 4) as usize;
        let pixels = self.frame.pixels();
        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                for (row, src) in pixels.chunks_exact(row_bytes).enumerate() {
                    let start = row * pitch;
                    buffer[start..start + row_bytes].copy_from_slice(src);
                }
            })
            .map_err(backend_err)?;
        self.canvas.copy(&texture, None, None).map_err(backend_err)?;
        self.canvas.present();
        Ok(())
    }
}

impl Viewport for SdlViewport {
    fn size(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    fn poll_event(&mut self) -> Option<WindowEvent> {
        // Skip events the browser has no use for.
        while let Some(event) = self.event_pump.poll_event() {
            if let Some(e) = map_sdl_event(event) {
                return Some(e);
            }
        }
        None
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.frame.fill_rect(x, y, w, h, color);
        Ok(())
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.frame.draw_rect(x, y, w, h, color);
        Ok(())
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: u32, color: Color) -> Result<()> {
        self.frame.hline(x, y, w, color);
        Ok(())
    }

    fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color) -> Result<()> {
        self.frame.draw_string(x, y, text, color);
        Ok(())
    }

    fn draw_glyph(&mut self, x: i32, y: i32, glyph: &Glyph, color: Color) -> Result<()> {
        self.frame.draw_glyph(x, y, glyph, color);
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.canvas.window_mut().set_title(title).map_err(backend_err)
    }

    fn invalidate(&mut self) -> Result<()> {
        self.present()
    }

    fn destroy(&mut self) {
        log::info!("SDL2 viewport closed");
        self.canvas.window_mut().hide();
    }
}

/// Map an SDL2 event to a window event.
fn map_sdl_event(event: Event) -> Option<WindowEvent> {
    match event {
        Event::Quit { .. } => Some(WindowEvent::Close),
        Event::KeyDown {
            keycode: Some(key), ..
        } => map_key_down(key).map(WindowEvent::Key),
        Event::MouseButtonDown { x, y, .. } => Some(WindowEvent::MouseDown { x, y }),
        // Printable characters arrive as text so the keyboard layout applies.
        Event::TextInput { text, .. } => text
            .chars()
            .next()
            .map(Key::Char)
            .filter(|k| k.printable().is_some())
            .map(WindowEvent::Key),
        _ => None,
    }
}

fn map_key_down(key: Keycode) -> Option<Key> {
    match key {
        Keycode::Return | Keycode::KpEnter => Some(Key::Enter),
        Keycode::Escape => Some(Key::Escape),
        Keycode::Backspace => Some(Key::Backspace),
        Keycode::Delete => Some(Key::Delete),
        Keycode::Up => Some(Key::Up),
        Keycode::Down => Some(Key::Down),
        Keycode::Left => Some(Key::Left),
        Keycode::Right => Some(Key::Right),
        Keycode::Home => Some(Key::Home),
        Keycode::End => Some(Key::End),
        Keycode::PageUp => Some(Key::PageUp),
        Keycode::PageDown => Some(Key::PageDown),
        _ => None,
    }
}
