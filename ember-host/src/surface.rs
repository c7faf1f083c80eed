//! Host display surfaces
//!
//! - [`TerminalSurface`] draws frames as text art on any writer
//! - [`SharedSurface`] serializes access to one surface across threads

use std::io::Write;
use std::sync::{Arc, Mutex};

use ember_core::compose::Framebuffer;
use ember_core::traits::{DisplaySurface, SurfaceError};
use embedded_graphics::prelude::Size;

/// ANSI: cursor home
const CURSOR_HOME: &str = "\x1b[H";
/// ANSI: clear screen
const CLEAR_SCREEN: &str = "\x1b[2J";

/// Renders each frame as half-block characters, two pixel rows per line
pub struct TerminalSurface<W> {
    out: W,
    size: Size,
    ansi: bool,
    frames: usize,
}

impl<W: Write> TerminalSurface<W> {
    /// Plain output: frames are appended one after another
    pub fn new(out: W, width: u32, height: u32) -> Self {
        Self {
            out,
            size: Size::new(width, height),
            ansi: false,
            frames: 0,
        }
    }

    /// Redraw in place using ANSI cursor control
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Frames transmitted so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, framebuffer: &Framebuffer) -> std::io::Result<()> {
        let mut text = String::new();
        if self.ansi {
            text.push_str(CURSOR_HOME);
        }
        let border = "-".repeat(framebuffer.width() as usize);
        text.push('+');
        text.push_str(&border);
        text.push_str("+\n");

        for y in (0..framebuffer.height() as i32).step_by(2) {
            text.push('|');
            for x in 0..framebuffer.width() as i32 {
                text.push(half_block(framebuffer.pixel(x, y), framebuffer.pixel(x, y + 1)));
            }
            text.push_str("|\n");
        }

        text.push('+');
        text.push_str(&border);
        text.push_str("+\n");
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

fn half_block(top: bool, bottom: bool) -> char {
    match (top, bottom) {
        (true, true) => '█',
        (true, false) => '▀',
        (false, true) => '▄',
        (false, false) => ' ',
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn clear(&mut self) -> Result<(), SurfaceError> {
        if self.ansi {
            self.out
                .write_all(CLEAR_SCREEN.as_bytes())
                .and_then(|_| self.out.flush())
                .map_err(|_| SurfaceError::Communication)?;
        }
        Ok(())
    }

    fn transmit(&mut self, framebuffer: &Framebuffer) -> Result<(), SurfaceError> {
        if framebuffer.width() != self.size.width || framebuffer.height() != self.size.height {
            return Err(SurfaceError::SizeMismatch);
        }
        self.write_frame(framebuffer)
            .map_err(|_| SurfaceError::Communication)?;
        self.frames += 1;
        Ok(())
    }

    fn dimensions(&self) -> Size {
        self.size
    }
}

/// A surface shared between threads
///
/// Each clear or transmit holds the lock for its whole duration, so an
/// updater thread and an animation thread can take turns on one panel
/// without interleaving a transmission.
pub struct SharedSurface<S>(Arc<Mutex<S>>);

impl<S> SharedSurface<S> {
    pub fn new(surface: S) -> Self {
        Self(Arc::new(Mutex::new(surface)))
    }

    /// Run `f` with exclusive access to the underlying surface
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R, SurfaceError> {
        let mut guard = self.0.lock().map_err(|_| SurfaceError::NotReady)?;
        Ok(f(&mut guard))
    }
}

impl<S> Clone for SharedSurface<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S: DisplaySurface> DisplaySurface for SharedSurface<S> {
    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.with(|s| s.clear())?
    }

    fn transmit(&mut self, framebuffer: &Framebuffer) -> Result<(), SurfaceError> {
        self.with(|s| s.transmit(framebuffer))?
    }

    fn dimensions(&self) -> Size {
        self.with(|s| s.dimensions()).unwrap_or(Size::zero())
    }

    fn is_ready(&self) -> bool {
        self.with(|s| s.is_ready()).unwrap_or(false)
    }
}
