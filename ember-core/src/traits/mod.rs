//! Hardware abstraction traits
//!
//! These traits define the interface between the rendering logic and the
//! display hardware, clock and cancellation source it runs against.

pub mod surface;
pub mod timing;

pub use surface::{DisplaySurface, SurfaceError};
pub use timing::{CancelToken, Clock, NeverCancel};
