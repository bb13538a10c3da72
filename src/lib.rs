//! Click Burst - a button that explodes every time you click it
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, click handling, ticking, timers)
//! - `widget`: The mounted component owning state, RNG and scheduled tasks
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedural click sounds
//! - `tuning`: Data-driven effect balance
//! - `settings`: Player preferences

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod widget;

pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};
pub use widget::ClickWidget;

use glam::Vec2;

/// Widget configuration constants
pub mod consts {
    /// Fixed animation tick period in milliseconds (~60 Hz)
    pub const TICK_MS: u32 = 16;

    /// Default rendering surface size (pixels)
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 480.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 480.0;

    /// Button radius at scale 1.0 (pixels)
    pub const BUTTON_RADIUS: f32 = 64.0;

    /// Label shown before the first click
    pub const INITIAL_LABEL: &str = "CLICK ME!";
}

/// Point on a circle of radius `r` at angle `theta`
#[inline]
pub fn polar_offset(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Parse a `#RRGGBB` hex color into linear-ish RGB floats
pub fn hex_to_rgb(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some([
        ((value >> 16) & 0xFF) as f32 / 255.0,
        ((value >> 8) & 0xFF) as f32 / 255.0,
        (value & 0xFF) as f32 / 255.0,
    ])
}
