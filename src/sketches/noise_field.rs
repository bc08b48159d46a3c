use anyhow::Result;

use crate::noise::Noise;
use crate::scheduler::{SchedulerState, Sketch};
use crate::surface::Surface;
use crate::types::{Color, Tick};

/// Value noise on the left half, Perlin noise on the right. Rendered once in
/// `setup`; the loop pauses itself since nothing changes.
pub struct NoiseField {
    noise: Noise,
    scale: f32,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self {
            noise: Noise::default(),
            scale: 0.02,
        }
    }
}

impl Sketch for NoiseField {
    fn setup(&mut self, surface: &mut Surface, state: &mut SchedulerState) -> Result<()> {
        let (w, h) = (surface.width(), surface.height());
        let value = self.noise.grid2(w, h, self.scale, (0.0, 0.0));
        let perlin = self.noise.perlin_grid2(w, h, self.scale, (0.0, 0.0));
        let half = w / 2;

        for y in 0..h {
            for x in 0..w {
                let i = (y * w + x) as usize;
                let v = if x < half { value[i] } else { perlin[i] };
                surface.set_pixel(x as i32, y as i32, Color::from_unit(v));
            }
        }
        state.pause();
        Ok(())
    }

    fn draw(&mut self, _surface: &mut Surface, _tick: Tick, _state: &mut SchedulerState) -> Result<()> {
        Ok(())
    }
}
