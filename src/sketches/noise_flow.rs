use anyhow::Result;

use crate::noise::Noise;
use crate::scheduler::{SchedulerState, Sketch};
use crate::surface::Surface;
use crate::types::{Color, Tick};

const MARKER: Color = Color::rgb(255, 0, 0);

/// A vertical strip of Perlin noise whose x coordinate drifts with time.
pub struct NoiseFlow {
    noise: Noise,
    scale: f32,
    strip_width: i32,
}

impl Default for NoiseFlow {
    fn default() -> Self {
        Self {
            noise: Noise::default(),
            scale: 0.05,
            strip_width: 100,
        }
    }
}

impl Sketch for NoiseFlow {
    fn draw(&mut self, surface: &mut Surface, tick: Tick, _state: &mut SchedulerState) -> Result<()> {
        surface.clear(Color::BLACK);

        let time = tick.frame as f32 * 0.01;
        let strip = self.strip_width.min(surface.width() as i32);
        let left = surface.width() as i32 / 2 - strip / 2;
        let bottom = surface.height() as i32 - 1;

        for x in left..left + strip {
            for y in 0..=bottom {
                let v = self.noise.perlin2(x as f32 * self.scale + time, y as f32 * self.scale);
                surface.set_pixel(x, y, Color::from_unit(v));
            }
        }

        surface.draw_line(left, 0, left, bottom, MARKER);
        surface.draw_line(left + strip - 1, 0, left + strip - 1, bottom, MARKER);
        Ok(())
    }
}
