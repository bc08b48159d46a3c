use std::f32::consts::FRAC_PI_2;

use anyhow::Result;

use crate::scheduler::{SchedulerState, Sketch};
use crate::surface::Surface;
use crate::types::{Color, Tick};

/// Angle between a branch and each of its children, in radians.
const SPREAD: f32 = 0.6;
const SHRINK: f32 = 0.7;

pub struct FractalTree {
    pub depth: u32,
}

impl Default for FractalTree {
    fn default() -> Self {
        Self { depth: 8 }
    }
}

impl FractalTree {
    fn branch(&self, surface: &mut Surface, (x, y): (i32, i32), length: i32, angle: f32, depth: u32) {
        if depth == 0 || length < 2 {
            return;
        }
        let x2 = x + (angle.cos() * length as f32) as i32;
        let y2 = y + (angle.sin() * length as f32) as i32;

        // Trunk levels are brown, the tips turn green.
        let t = depth as i32;
        let color = Color::clamped((40 + t * 15).min(200), (80 + (8 - t) * 25).min(255), 40);
        surface.draw_line(x, y, x2, y2, color);

        let next = (length as f32 * SHRINK) as i32;
        self.branch(surface, (x2, y2), next, angle - SPREAD, depth - 1);
        self.branch(surface, (x2, y2), next, angle + SPREAD, depth - 1);
    }
}

impl Sketch for FractalTree {
    fn draw(&mut self, surface: &mut Surface, tick: Tick, _state: &mut SchedulerState) -> Result<()> {
        surface.clear(Color::BLACK);
        let root = (surface.width() as i32 / 2, surface.height() as i32 - 10);
        let length = surface.height() as i32 / 3;
        let sway = 0.3 * (tick.frame as f32 * 0.03).sin();
        self.branch(surface, root, length, -FRAC_PI_2 + sway, self.depth);
        Ok(())
    }
}
