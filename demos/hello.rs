//! Minimal sketch built from two closures: a bouncing ball over a slowly
//! shifting background.
//!
//! Run with: cargo run --example hello

use kanvas::{sketch_fn, utils::hsv_to_rgb, Color, Paint, SketchConfig, Surface, Tick};

fn main() -> anyhow::Result<()> {
    let config = SketchConfig {
        width: 160,
        height: 90,
        title: "hello".to_string(),
        ..SketchConfig::load()
    };

    let (mut x, mut y) = (20.0f32, 30.0f32);
    let (mut vx, mut vy) = (60.0f32, 45.0f32);
    let radius = 8;

    let mut sketch = sketch_fn(
        |surface: &mut Surface| {
            surface.clear(Color::BLACK);
            Ok(())
        },
        move |surface: &mut Surface, tick: Tick| {
            let (w, h) = (surface.width() as f32, surface.height() as f32);
            x += vx * tick.dt_secs();
            y += vy * tick.dt_secs();
            if x < radius as f32 || x > w - radius as f32 {
                vx = -vx;
                x = x.clamp(radius as f32, w - radius as f32);
            }
            if y < radius as f32 || y > h - radius as f32 {
                vy = -vy;
                y = y.clamp(radius as f32, h - radius as f32);
            }

            let (r, g, b) = hsv_to_rgb(tick.frame as f64 * 0.5, 0.5, 0.25);
            surface.clear(Color::rgb(r, g, b));
            surface.draw_circle(x as i32, y as i32, radius, Color::WHITE, Paint::Fill);
            Ok(())
        },
    );

    kanvas::run(&mut sketch, &config)
}
