//! Display surface trait

use embedded_graphics::prelude::Size;

use crate::compose::Framebuffer;

/// Errors reported by a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// Bus or transport failure while talking to the display
    Communication,
    /// Display absent or not initialized
    NotReady,
    /// Framebuffer doesn't match the display geometry
    SizeMismatch,
}

/// A physical (or simulated) monochrome display
///
/// The renderer composes into a [`Framebuffer`] and hands it over whole;
/// implementations only need to clear the panel and push pixels. Calls are
/// not reentrant: callers must serialize access to a surface.
pub trait DisplaySurface {
    /// Blank the panel
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Push a complete framebuffer to the panel
    fn transmit(&mut self, framebuffer: &Framebuffer) -> Result<(), SurfaceError>;

    /// Panel size in pixels
    fn dimensions(&self) -> Size;

    /// Check if the panel is ready to accept frames
    fn is_ready(&self) -> bool {
        true
    }
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn clear(&mut self) -> Result<(), SurfaceError> {
        (**self).clear()
    }

    fn transmit(&mut self, framebuffer: &Framebuffer) -> Result<(), SurfaceError> {
        (**self).transmit(framebuffer)
    }

    fn dimensions(&self) -> Size {
        (**self).dimensions()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
