//! Shared boundary types for the sketch runtime.
//!
//! This module defines the data that crosses subsystem lines:
//! - User code → Surface: `Color`
//! - Surface → Display / ImageWriter: `Pixel`
//! - Display → Scheduler: `Signal`
//! - Scheduler → Sketch / Display: `Tick`, `FrameStatus`

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// One stored cell of the raster buffer, as `[r, g, b]`.
pub type Pixel = [u8; 3];

pub const BLACK: Pixel = [0, 0, 0];

/// A drawing color. Grayscale and RGB are separate variants instead of
/// arity-based overloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Gray(u8),
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    pub const BLACK: Color = Color::Gray(0);
    pub const WHITE: Color = Color::Gray(255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Build an RGB color from unbounded integer components, clamping each
    /// to `0..=255`.
    pub fn clamped(r: i32, g: i32, b: i32) -> Self {
        Color::Rgb {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    /// Grayscale counterpart of [`Color::clamped`].
    pub fn gray_clamped(v: i32) -> Self {
        Color::Gray(clamp_channel(v))
    }

    /// Map a unit value (e.g. a noise sample) to a gray level.
    /// Values outside `[0, 1]` saturate.
    pub fn from_unit(v: f32) -> Self {
        Color::Gray((v.clamp(0.0, 1.0) * 255.0) as u8)
    }

    pub const fn pixel(self) -> Pixel {
        match self {
            Color::Gray(v) => [v, v, v],
            Color::Rgb { r, g, b } => [r, g, b],
        }
    }
}

impl From<Pixel> for Color {
    fn from([r, g, b]: Pixel) -> Self {
        Color::Rgb { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::Rgb { r, g, b }
    }
}

fn clamp_channel(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

// ---------------------------------------------------------------------------
// Display → Scheduler
// ---------------------------------------------------------------------------

/// Discrete request reported by a display once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    #[default]
    None,
    Quit,
    SaveFrame,
    ToggleLoop,
}

// ---------------------------------------------------------------------------
// Scheduler → Sketch / Display
// ---------------------------------------------------------------------------

/// Per-draw timing handed to `Sketch::draw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// 1-based count of draw invocations, including this one.
    pub frame: u64,
    /// Wall-clock time since the previous tick.
    pub dt: Duration,
}

impl Tick {
    pub fn dt_secs(&self) -> f32 {
        self.dt.as_secs_f32()
    }

    pub fn dt_ms(&self) -> f64 {
        self.dt.as_secs_f64() * 1000.0
    }
}

/// What a display may show alongside the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStatus {
    pub frame: u64,
    pub looping: bool,
    /// Ticks per second derived from the last tick's `dt`; 0 before the first.
    pub fps: f32,
}
