use anyhow::Result;

use crate::scheduler::{SchedulerState, Sketch};
use crate::surface::Surface;
use crate::types::{Color, Tick};

const YELLOW: Color = Color::rgb(255, 255, 0);

pub struct OscillatingLine;

impl Sketch for OscillatingLine {
    fn draw(&mut self, surface: &mut Surface, tick: Tick, _state: &mut SchedulerState) -> Result<()> {
        surface.clear(Color::BLACK);
        let mid_y = surface.height() as i32 / 2;
        let offset = (20.0 * (tick.frame as f32 * 0.1).sin()) as i32;
        surface.draw_line(0, mid_y, surface.width() as i32, mid_y + offset, YELLOW);
        Ok(())
    }
}
