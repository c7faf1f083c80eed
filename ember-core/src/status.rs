//! Kiln status layout
//!
//! Maps a [`StatusSnapshot`] to a [`Frame`] of up to five text lines:
//!
//! ```text
//! RUNNING - Cone 6 Glaze
//! Temp: 1250°F
//! Targ: 1300°F
//! Time: 01:00:00 / 02:00:00
//! Rem: 01:00:00 150°/hr
//! ```
//!
//! Layout is total: missing or nonsensical fields produce placeholder text
//! (`---`, `--:--`), never an error.

use core::fmt::Write;

use embedded_graphics::prelude::Point;
use heapless::String;

use crate::compose::{push_bounded, truncate_chars, Frame, TextLine};
use crate::config::{DisplayConfig, TempScale};
use crate::icon::{Bitmap, StatusIcon};

/// Maximum length of a free-form state label
pub const MAX_STATE_LEN: usize = 16;

/// Maximum stored profile name length in bytes
pub const MAX_PROFILE_LEN: usize = 32;

/// Horizontal gap between a badge icon and its text
pub const BADGE_GAP: i32 = 8;

/// Oven operating state as reported by the controller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OvenState {
    #[default]
    Idle,
    Running,
    Paused,
    /// Any other controller state, shown verbatim
    Other(String<MAX_STATE_LEN>),
}

impl OvenState {
    /// Parse a controller state name (case-insensitive)
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("IDLE") {
            OvenState::Idle
        } else if name.eq_ignore_ascii_case("RUNNING") {
            OvenState::Running
        } else if name.eq_ignore_ascii_case("PAUSED") {
            OvenState::Paused
        } else {
            let mut label = String::new();
            for ch in name.chars() {
                if label.push(ch).is_err() {
                    break;
                }
            }
            OvenState::Other(label)
        }
    }

    /// Label shown on the state line
    pub fn label(&self) -> &str {
        match self {
            OvenState::Idle => "IDLE",
            OvenState::Running => "RUNNING",
            OvenState::Paused => "PAUSED",
            OvenState::Other(label) => label.as_str(),
        }
    }

    /// Running or paused, i.e. a firing is in progress
    pub fn is_firing(&self) -> bool {
        matches!(self, OvenState::Running | OvenState::Paused)
    }
}

/// One reading of the kiln controller, supplied per update cycle
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub state: OvenState,
    /// Current temperature in the configured scale
    pub temperature: Option<f32>,
    /// Target temperature in the configured scale
    pub target: Option<f32>,
    /// Active firing profile
    pub profile: Option<String<MAX_PROFILE_LEN>>,
    /// Seconds since the firing started
    pub runtime: f32,
    /// Total profile duration (seconds), zero when unknown
    pub total_time: f32,
    /// Degrees per hour, negative while cooling
    pub heat_rate: f32,
}

impl StatusSnapshot {
    /// Set the profile name, cut to the stored capacity
    pub fn with_profile(mut self, name: &str) -> Self {
        let mut profile = String::new();
        for ch in name.chars() {
            if profile.push(ch).is_err() {
                break;
            }
        }
        self.profile = Some(profile);
        self
    }

    /// Seconds left in the firing; negative when overrun
    pub fn remaining(&self) -> f32 {
        if self.total_time > 0.0 {
            self.total_time - self.runtime
        } else {
            0.0
        }
    }
}

/// Round to the nearest integer, ties to even, saturating at the `i32`
/// range
pub fn round_nearest(value: f32) -> i32 {
    libm::rintf(value) as i32
}

/// Format a temperature, e.g. `1250°F`; `---` when absent
pub fn format_temperature(temp: Option<f32>, scale: TempScale) -> String<16> {
    let mut out = String::new();
    match temp {
        Some(t) if t.is_finite() => {
            let _ = write!(out, "{}{}", round_nearest(t), scale.unit());
        }
        _ => {
            let _ = out.push_str("---");
        }
    }
    out
}

/// Format a duration as `HH:MM:SS` (one hour or more) or `MM:SS`
///
/// Absent, negative and non-finite durations give `--:--`.
pub fn format_time(seconds: Option<f32>) -> String<16> {
    let mut out = String::new();
    let secs = match seconds {
        Some(s) if s >= 0.0 && s.is_finite() => s as u64,
        _ => {
            let _ = out.push_str("--:--");
            return out;
        }
    };

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let secs = secs % 60;
    let _ = if hours > 0 {
        write!(out, "{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        write!(out, "{:02}:{:02}", minutes, secs)
    };
    out
}

fn format_rate(out: &mut TextLine, rate: f32) {
    let _ = write!(out, "{}°/hr", round_nearest(rate));
}

/// Lay out the status screen for `snapshot`
///
/// Lines sit `line_height` pixels apart and are cut to `max_line_chars`
/// when drawn. The time block only appears while firing with a known total
/// time; otherwise a positive heat rate gets a line of its own.
pub fn layout(snapshot: &StatusSnapshot, config: &DisplayConfig) -> Frame<'static> {
    let mut frame = Frame::new();
    let mut row: u32 = 0;
    let mut line = |frame: &mut Frame<'static>, text: &TextLine| {
        let y = i32::try_from(row.saturating_mul(config.line_height)).unwrap_or(i32::MAX);
        row += 1;
        let _ = frame.push_text(Point::new(0, y), text, config.max_line_chars);
    };

    let mut text = TextLine::new();
    push_bounded(&mut text, snapshot.state.label());
    if let Some(profile) = snapshot.profile.as_deref().filter(|p| !p.is_empty()) {
        push_bounded(&mut text, " - ");
        push_bounded(&mut text, truncate_chars(profile, config.profile_chars));
    }
    line(&mut frame, &text);

    text.clear();
    let _ = write!(
        text,
        "Temp: {}",
        format_temperature(snapshot.temperature, config.temp_scale)
    );
    line(&mut frame, &text);

    text.clear();
    let _ = write!(
        text,
        "Targ: {}",
        format_temperature(snapshot.target, config.temp_scale)
    );
    line(&mut frame, &text);

    if snapshot.state.is_firing() && snapshot.total_time > 0.0 {
        text.clear();
        let _ = write!(
            text,
            "Time: {} / {}",
            format_time(Some(snapshot.runtime)),
            format_time(Some(snapshot.total_time))
        );
        line(&mut frame, &text);

        text.clear();
        let _ = write!(text, "Rem: {}", format_time(Some(snapshot.remaining())));
        if snapshot.heat_rate > 0.0 {
            let _ = text.push(' ');
            format_rate(&mut text, snapshot.heat_rate);
        }
        line(&mut frame, &text);
    } else if snapshot.heat_rate > 0.0 {
        text.clear();
        let _ = text.push_str("Rate: ");
        format_rate(&mut text, snapshot.heat_rate);
        line(&mut frame, &text);
    }

    frame
}

/// Pick the status icon for a snapshot
///
/// Idle kilns that aren't cooling get no icon.
pub fn status_icon(snapshot: &StatusSnapshot) -> Option<StatusIcon> {
    match snapshot.state {
        OvenState::Other(_) => Some(StatusIcon::StopSign),
        OvenState::Paused => Some(StatusIcon::Clock),
        _ if snapshot.heat_rate < 0.0 => Some(StatusIcon::Snowflake),
        OvenState::Running => Some(StatusIcon::Flame),
        OvenState::Idle => None,
    }
}

/// One-line summary shown next to a status icon
pub fn badge_text(snapshot: &StatusSnapshot, config: &DisplayConfig) -> TextLine {
    let mut text = TextLine::new();
    let _ = match status_icon(snapshot) {
        Some(StatusIcon::Flame) => write!(
            text,
            "Temp: {}",
            format_temperature(snapshot.temperature, config.temp_scale)
        ),
        Some(StatusIcon::Clock) => {
            write!(text, "Time: {}", format_time(Some(snapshot.runtime)))
        }
        Some(StatusIcon::Snowflake) => text.push_str("Cooling...").map_err(|_| core::fmt::Error),
        Some(StatusIcon::StopSign) => text.push_str("STOPPED").map_err(|_| core::fmt::Error),
        None => text
            .push_str(snapshot.state.label())
            .map_err(|_| core::fmt::Error),
    };
    text
}

/// Icon at the top-left corner with a line of text beside it
pub fn badge<'a>(icon: &'a Bitmap, text: &str, config: &DisplayConfig) -> Frame<'a> {
    let x = icon.width() as i32 + BADGE_GAP;
    Frame::new()
        .with_bitmap(Point::zero(), icon)
        .with_text(Point::new(x, 2), text, config.max_line_chars)
}
