//! Display demos
//!
//! Replays the controller's icon, logo and pottery showcases on any
//! surface. Missing icon files are skipped, never fatal.

use std::sync::Arc;

use ember_core::animation::{self, AnimationSequence, PlaybackMode, PlaybackState};
use ember_core::compose::{center, Frame, TextRasterizer};
use ember_core::icon::{Bitmap, StatusIcon};
use ember_core::status::{self, OvenState, StatusSnapshot};
use ember_core::traits::{CancelToken, Clock, DisplaySurface};
use ember_core::{Display, RenderError};
use embedded_graphics::prelude::Point;
use embedded_hal::delay::DelayNs;
use tracing::{info, warn};

use crate::icons::IconLibrary;
use crate::time::Deadline;

/// Hold time for each static demo screen (ms)
pub const SCREEN_MS: u32 = 2000;

/// Logo frame period and run time (ms)
pub const LOGO_FRAME_MS: u32 = 200;
pub const LOGO_RUN_MS: u32 = 10_000;

/// Pottery frame period and run time (ms)
pub const POTTERY_FRAME_MS: u32 = 150;
pub const POTTERY_RUN_MS: u32 = 10_000;

/// Icon grid column pitch (px)
const GRID_PITCH: i32 = 20;

/// Left-to-right order of the icon grid
const GRID_ORDER: [StatusIcon; 4] = [
    StatusIcon::Flame,
    StatusIcon::Clock,
    StatusIcon::StopSign,
    StatusIcon::Snowflake,
];

/// Status icons with a line of text each
pub const ICON_SCENARIOS: [(StatusIcon, &str); 4] = [
    (StatusIcon::Flame, "Temp: 1250°F"),
    (StatusIcon::Clock, "Time: 01:30:00"),
    (StatusIcon::StopSign, "STOPPED"),
    (StatusIcon::Snowflake, "Cooling..."),
];

/// Idle, firing and paused readings, as a controller would report them
pub fn sample_snapshots() -> Vec<StatusSnapshot> {
    vec![
        StatusSnapshot {
            state: OvenState::Idle,
            temperature: Some(75.0),
            target: Some(0.0),
            ..Default::default()
        },
        StatusSnapshot {
            state: OvenState::Running,
            temperature: Some(1250.0),
            target: Some(1300.0),
            runtime: 3600.0,
            total_time: 7200.0,
            heat_rate: 150.0,
            ..Default::default()
        }
        .with_profile("Cone 6 Glaze"),
        StatusSnapshot {
            state: OvenState::Paused,
            temperature: Some(1800.0),
            target: Some(1800.0),
            runtime: 5400.0,
            total_time: 10800.0,
            heat_rate: 0.0,
            ..Default::default()
        }
        .with_profile("Cone 10"),
    ]
}

/// Each status icon next to its text, then all icons in a row
///
/// Stops before the next screen once `cancel` fires.
pub fn icons<S, T, D, K>(
    display: &mut Display<S, T>,
    library: &mut IconLibrary,
    delay: &mut D,
    cancel: &K,
) -> Result<(), RenderError>
where
    S: DisplaySurface,
    T: TextRasterizer,
    D: DelayNs,
    K: CancelToken + ?Sized,
{
    let loaded: Vec<(StatusIcon, Option<Arc<Bitmap>>)> = StatusIcon::ALL
        .iter()
        .map(|&icon| (icon, library.load(icon.name())))
        .collect();
    for (icon, bitmap) in &loaded {
        match bitmap {
            Some(b) => info!(
                icon = icon.name(),
                width = b.width(),
                height = b.height(),
                "Icon loaded"
            ),
            None => warn!(icon = icon.name(), "Icon failed to load"),
        }
    }
    let find = |wanted: StatusIcon| {
        loaded
            .iter()
            .find(|(icon, _)| *icon == wanted)
            .and_then(|(_, bitmap)| bitmap.as_deref())
    };

    let config = display.config().clone();
    for (icon, text) in ICON_SCENARIOS {
        if cancel.is_cancelled() {
            return Ok(());
        }
        let frame = match find(icon) {
            Some(bitmap) => status::badge(bitmap, text, &config),
            None => Frame::new().with_text(
                Point::new(config.icon_width as i32 + status::BADGE_GAP, 2),
                text,
                config.max_line_chars,
            ),
        };
        display.render(&frame)?;
        delay.delay_ms(SCREEN_MS);
    }

    if cancel.is_cancelled() {
        return Ok(());
    }
    let mut grid = Frame::new();
    for (i, icon) in GRID_ORDER.into_iter().enumerate() {
        if let Some(bitmap) = find(icon) {
            let _ = grid.push_bitmap(Point::new(i as i32 * GRID_PITCH, 0), bitmap);
        }
    }
    let _ = grid.push_text(Point::new(0, 20), "All Icons", config.max_line_chars);
    display.render(&grid)?;
    delay.delay_ms(SCREEN_MS);
    Ok(())
}

/// The kiln god logo loop
///
/// Returns `None` when no logo frames could be loaded.
pub fn logo<S, T, D, C, K>(
    display: &mut Display<S, T>,
    library: &mut IconLibrary,
    delay: &mut D,
    clock: &C,
    cancel: &K,
) -> Result<Option<PlaybackState>, RenderError>
where
    S: DisplaySurface,
    T: TextRasterizer,
    D: DelayNs,
    C: Clock + ?Sized,
    K: CancelToken + ?Sized,
{
    let frames = library.load_series("kiln_god_", 0..6);
    if frames.is_empty() {
        warn!("No frames loaded for logo animation");
        return Ok(None);
    }
    info!(frames = frames.len(), "Animating logo");

    let sequence = AnimationSequence::from_bitmaps(
        frames.iter().map(|f| f.as_ref()),
        LOGO_FRAME_MS,
        PlaybackMode::TimeboxedLoop(LOGO_RUN_MS),
        |_| Point::zero(),
    );
    animation::play(display, &sequence, delay, clock, cancel).map(Some)
}

/// The pottery flame flicker: base image then flames, ping-ponged
///
/// Frames are centred horizontally and play until `cancel` fires or the
/// run time is up. Returns `None` when the base image or every flame frame
/// is missing.
pub fn pottery<S, T, D, C, K>(
    display: &mut Display<S, T>,
    library: &mut IconLibrary,
    delay: &mut D,
    clock: &C,
    cancel: &K,
) -> Result<Option<PlaybackState>, RenderError>
where
    S: DisplaySurface,
    T: TextRasterizer,
    D: DelayNs,
    C: Clock + ?Sized,
    K: CancelToken + ?Sized,
{
    let base = library.load("pottery");
    let flames = library.load_series("pottery_flame_", 1..6);
    let Some(base) = base.filter(|_| !flames.is_empty()) else {
        warn!("Insufficient frames loaded for pottery animation");
        return Ok(None);
    };
    info!(frames = flames.len() + 1, "Animating pottery");

    let (width, height) = (display.config().width, display.config().height);
    let sequence = AnimationSequence::from_bitmaps(
        std::iter::once(base.as_ref()).chain(flames.iter().map(|f| f.as_ref())),
        POTTERY_FRAME_MS,
        PlaybackMode::PingPong,
        |b| Point::new(center(width, height, b.width(), b.height()).x, 0),
    );
    let deadline = Deadline::after(clock, POTTERY_RUN_MS);
    animation::play(display, &sequence, delay, clock, &(cancel, deadline)).map(Some)
}
