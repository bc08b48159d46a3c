use anyhow::Result;

use crate::scheduler::{SchedulerState, Sketch};
use crate::surface::{Paint, Surface};
use crate::types::{Color, Tick};

pub struct Shapes;

impl Sketch for Shapes {
    fn draw(&mut self, surface: &mut Surface, _tick: Tick, _state: &mut SchedulerState) -> Result<()> {
        let (w, h) = (surface.width() as i32, surface.height() as i32);
        surface.clear(Color::BLACK);
        surface.draw_line(10, 10, w - 10, h - 10, Color::WHITE);
        surface.draw_rect(20, 20, 100, 60, Color::rgb(255, 0, 0), Paint::Stroke);
        surface.draw_circle(w / 2, h / 2, 50, Color::rgb(0, 255, 0), Paint::Stroke);
        Ok(())
    }
}
