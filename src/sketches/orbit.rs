use std::f32::consts::TAU;

use anyhow::Result;

use crate::scheduler::{SchedulerState, Sketch};
use crate::surface::{Paint, Surface};
use crate::types::{Color, Tick};

const BACKGROUND: Color = Color::rgb(30, 30, 40);
const SATELLITES: usize = 5;

pub struct Orbit;

impl Sketch for Orbit {
    fn setup(&mut self, surface: &mut Surface, _state: &mut SchedulerState) -> Result<()> {
        surface.clear(BACKGROUND);
        Ok(())
    }

    fn draw(&mut self, surface: &mut Surface, tick: Tick, _state: &mut SchedulerState) -> Result<()> {
        surface.clear(BACKGROUND);

        let (cx, cy) = (surface.width() as i32 / 2, surface.height() as i32 / 2);
        let orbit = (cx.min(cy) as f32 * 0.45).max(1.0);
        let body = (orbit * 0.35) as i32;
        let frame = tick.frame as f32;

        for i in 0..SATELLITES {
            let phase = i as f32;
            let angle = frame * 0.02 + phase * (TAU / SATELLITES as f32);
            let x = cx + (angle.cos() * orbit) as i32;
            let y = cy + (angle.sin() * orbit) as i32;
            let wave = |shift: f32| (127.0 + 127.0 * (frame * 0.05 + phase + shift).sin()) as i32;
            surface.draw_circle(x, y, body, Color::clamped(wave(0.0), wave(2.0), wave(4.0)), Paint::Fill);
        }

        surface.draw_circle(cx, cy, (body * 2 / 3).max(1), Color::WHITE, Paint::Fill);
        Ok(())
    }
}
