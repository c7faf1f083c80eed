//! Renderer
//!
//! Owns the display surface and a private framebuffer. Every render pass
//! goes through a [`Canvas`], which starts blank and is handed to the
//! surface when the pass ends, whichever way it ends.

use core::ops::{Deref, DerefMut};

use embedded_graphics::prelude::Point;

use crate::compose::{self, Frame, Framebuffer, MonoText, TextRasterizer};
use crate::config::DisplayConfig;
use crate::icon::Bitmap;
use crate::status::{layout, StatusSnapshot};
use crate::traits::{DisplaySurface, SurfaceError};

/// A render cycle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// The surface rejected the frame
    Surface(SurfaceError),
}

impl From<SurfaceError> for RenderError {
    fn from(e: SurfaceError) -> Self {
        RenderError::Surface(e)
    }
}

/// Renders frames onto a display surface
///
/// Taking `&mut self` for every pass keeps composition and transmission
/// non-reentrant for a given surface.
pub struct Display<S, T = MonoText> {
    surface: S,
    config: DisplayConfig,
    text: T,
    framebuffer: Framebuffer,
}

impl<S: DisplaySurface> Display<S> {
    /// Create a renderer using the default 6x10 font
    pub fn new(surface: S, config: DisplayConfig) -> Self {
        Self::with_text(surface, config, MonoText::default())
    }
}

impl<S: DisplaySurface, T: TextRasterizer> Display<S, T> {
    /// Create a renderer with a custom text rasterizer
    pub fn with_text(surface: S, config: DisplayConfig, text: T) -> Self {
        let framebuffer = Framebuffer::new(config.width, config.height);
        if config.enabled {
            info!("Display ready: {}x{}", config.width, config.height);
        } else {
            info!("Display disabled in config");
        }
        Self {
            surface,
            config,
            text,
            framebuffer,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Last framebuffer handed to the surface
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Enabled in config and the surface is ready
    pub fn is_active(&self) -> bool {
        self.config.enabled && self.surface.is_ready()
    }

    /// Begin a render pass on a blank framebuffer
    ///
    /// Returns `None` when the display is inactive.
    pub fn canvas(&mut self) -> Option<Canvas<'_, S, T>> {
        if !self.is_active() {
            return None;
        }
        self.framebuffer.clear();
        Some(Canvas {
            display: self,
            committed: false,
        })
    }

    /// Run one render pass; the canvas is committed when `draw` returns
    ///
    /// Inactive displays skip the pass and report success.
    pub fn draw<F>(&mut self, draw: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut Canvas<'_, S, T>),
    {
        match self.canvas() {
            Some(mut canvas) => {
                draw(&mut canvas);
                canvas.finish()
            }
            None => Ok(()),
        }
    }

    /// Compose `frame` onto a blank framebuffer and transmit it
    pub fn render(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        self.draw(|canvas| canvas.compose(frame))
    }

    /// Show an arbitrary-size bitmap full screen, scaled down if needed
    pub fn show_background(&mut self, bitmap: &Bitmap) -> Result<(), RenderError> {
        let background = compose::fit_to_screen(bitmap, self.config.width, self.config.height);
        self.draw(|canvas| **canvas = background)
    }

    /// Show a single message on `line`, cut to the configured line length
    pub fn show_message(&mut self, message: &str, line: u32) -> Result<(), RenderError> {
        let y = i32::try_from(line.saturating_mul(self.config.line_height)).unwrap_or(i32::MAX);
        let max = self.config.max_line_chars;
        self.draw(|canvas| canvas.text(Point::new(0, y), message, max))
    }

    /// Lay out and render a status snapshot
    pub fn update(&mut self, snapshot: &StatusSnapshot) -> Result<(), RenderError> {
        if !self.is_active() {
            return Ok(());
        }
        let frame = layout(snapshot, &self.config);
        self.render(&frame)
    }

    /// Blank the panel
    pub fn clear(&mut self) -> Result<(), RenderError> {
        if !self.is_active() {
            return Ok(());
        }
        self.framebuffer.clear();
        self.surface.clear().map_err(|e| {
            error!("Error clearing display");
            RenderError::from(e)
        })
    }
}

/// Scoped access to the framebuffer for one render pass
///
/// Dereferences to the [`Framebuffer`]. Call [`finish`](Canvas::finish) to
/// transmit and observe the result; dropping an unfinished canvas still
/// transmits and logs any failure, so a pass is never silently discarded.
pub struct Canvas<'d, S: DisplaySurface, T: TextRasterizer> {
    display: &'d mut Display<S, T>,
    committed: bool,
}

impl<S: DisplaySurface, T: TextRasterizer> Canvas<'_, S, T> {
    /// Draw at most `max_length` characters of `text` at `position`
    pub fn text(&mut self, position: Point, text: &str, max_length: usize) {
        let display = &mut *self.display;
        compose::draw_text(
            &mut display.framebuffer,
            position,
            text,
            max_length,
            &display.text,
        );
    }

    /// Paste a bitmap's lit pixels at `position`
    pub fn bitmap(&mut self, position: Point, bitmap: &Bitmap) {
        compose::draw_bitmap(&mut self.display.framebuffer, position, bitmap);
    }

    /// Draw every operation of a frame
    pub fn compose(&mut self, frame: &Frame<'_>) {
        let display = &mut *self.display;
        compose::compose(&mut display.framebuffer, frame, &display.text);
    }

    /// Unlight the whole framebuffer
    pub fn clear(&mut self) {
        self.display.framebuffer.clear();
    }

    /// Transmit the framebuffer and end the pass
    pub fn finish(mut self) -> Result<(), RenderError> {
        self.commit()
    }

    fn commit(&mut self) -> Result<(), RenderError> {
        self.committed = true;
        let display = &mut *self.display;
        display
            .surface
            .transmit(&display.framebuffer)
            .map_err(RenderError::from)
    }
}

impl<S: DisplaySurface, T: TextRasterizer> Deref for Canvas<'_, S, T> {
    type Target = Framebuffer;

    fn deref(&self) -> &Framebuffer {
        &self.display.framebuffer
    }
}

impl<S: DisplaySurface, T: TextRasterizer> DerefMut for Canvas<'_, S, T> {
    fn deref_mut(&mut self) -> &mut Framebuffer {
        &mut self.display.framebuffer
    }
}

impl<S: DisplaySurface, T: TextRasterizer> Drop for Canvas<'_, S, T> {
    fn drop(&mut self) {
        if !self.committed && self.commit().is_err() {
            error!("Display transmit failed on canvas drop");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::status::OvenState;
    use alloc::vec::Vec;
    use embedded_graphics::prelude::Size;

    /// Surface that keeps a copy of every transmitted framebuffer
    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub frames: Vec<Framebuffer>,
        pub clears: usize,
        pub fail: bool,
        pub not_ready: bool,
    }

    impl DisplaySurface for RecordingSurface {
        fn clear(&mut self) -> Result<(), SurfaceError> {
            self.clears += 1;
            Ok(())
        }

        fn transmit(&mut self, framebuffer: &Framebuffer) -> Result<(), SurfaceError> {
            if self.fail {
                return Err(SurfaceError::Communication);
            }
            self.frames.push(framebuffer.clone());
            Ok(())
        }

        fn dimensions(&self) -> Size {
            Size::new(128, 64)
        }

        fn is_ready(&self) -> bool {
            !self.not_ready
        }
    }

    #[test]
    fn test_render_transmits_once() {
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());
        let icon = Bitmap::from_packed(8, 1, &[0xFF]);
        let frame = Frame::new().with_bitmap(Point::new(0, 0), &icon);

        display.render(&frame).unwrap();

        assert_eq!(display.surface().frames.len(), 1);
        assert_eq!(display.surface().frames[0].count_lit(), 8);
    }

    #[test]
    fn test_each_pass_starts_blank() {
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());
        let icon = Bitmap::from_packed(8, 1, &[0xFF]);
        display
            .render(&Frame::new().with_bitmap(Point::new(0, 0), &icon))
            .unwrap();
        display
            .render(&Frame::new().with_bitmap(Point::new(0, 10), &icon))
            .unwrap();

        let last = &display.surface().frames[1];
        assert_eq!(last.count_lit(), 8);
        assert!(!last.pixel(0, 0));
    }

    #[test]
    fn test_dropped_canvas_still_commits() {
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());
        {
            let mut canvas = display.canvas().unwrap();
            canvas.set_pixel(3, 3, true);
        }
        assert_eq!(display.surface().frames.len(), 1);
        assert!(display.surface().frames[0].pixel(3, 3));
    }

    #[test]
    fn test_finished_canvas_commits_once() {
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());
        let canvas = display.canvas().unwrap();
        canvas.finish().unwrap();
        assert_eq!(display.surface().frames.len(), 1);
    }

    #[test]
    fn test_transmit_failure_is_reported() {
        let surface = RecordingSurface {
            fail: true,
            ..Default::default()
        };
        let mut display = Display::new(surface, DisplayConfig::default());
        assert_eq!(
            display.show_message("hello", 0),
            Err(RenderError::Surface(SurfaceError::Communication))
        );
    }

    #[test]
    fn test_disabled_display_is_noop() {
        let config = DisplayConfig {
            enabled: false,
            ..Default::default()
        };
        let mut display = Display::new(RecordingSurface::default(), config);
        assert!(display.canvas().is_none());
        display.show_message("hello", 0).unwrap();
        display.clear().unwrap();
        display.update(&StatusSnapshot::default()).unwrap();
        assert!(display.surface().frames.is_empty());
        assert_eq!(display.surface().clears, 0);
    }

    #[test]
    fn test_not_ready_surface_is_noop() {
        let surface = RecordingSurface {
            not_ready: true,
            ..Default::default()
        };
        let mut display = Display::new(surface, DisplayConfig::default());
        display.show_message("hello", 0).unwrap();
        assert!(display.surface().frames.is_empty());
    }

    #[test]
    fn test_show_message_uses_line_height() {
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());
        display.show_message("Kiln Controller", 2).unwrap();
        let fb = &display.surface().frames[0];
        assert!(fb.count_lit() > 0);
        for y in 0..24 {
            for x in 0..128 {
                assert!(!fb.pixel(x, y));
            }
        }
    }

    #[test]
    fn test_show_message_far_line_is_clipped() {
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());
        display.show_message("off screen", u32::MAX).unwrap();
        assert_eq!(display.surface().frames.len(), 1);
        assert_eq!(display.surface().frames[0].count_lit(), 0);
    }

    #[test]
    fn test_show_background_centres_icon() {
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());
        let icon = Bitmap::from_bits(32, 32, core::iter::repeat(true));
        display.show_background(&icon).unwrap();
        let fb = &display.surface().frames[0];
        assert!(fb.pixel(48, 16));
        assert_eq!(fb.count_lit(), 1024);
    }

    #[test]
    fn test_update_renders_status() {
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());
        let snapshot = StatusSnapshot {
            state: OvenState::Idle,
            temperature: Some(75.0),
            target: Some(0.0),
            ..Default::default()
        };
        display.update(&snapshot).unwrap();
        assert_eq!(display.surface().frames.len(), 1);
        assert!(display.framebuffer().count_lit() > 0);
    }

    #[test]
    fn test_clear_reaches_surface() {
        let mut display = Display::new(RecordingSurface::default(), DisplayConfig::default());
        display.clear().unwrap();
        assert_eq!(display.surface().clears, 1);
    }
}
