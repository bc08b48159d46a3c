//! kanvas: a small creative-coding toolkit.
//!
//! A [`Sketch`] draws into a [`Surface`]; the [`Scheduler`] calls it at a
//! fixed cadence and hands each frame to a [`Display`]. [`run`] wires the
//! pieces up for an interactive terminal session and [`render_headless`]
//! does the same without any output device.

pub mod config;
pub mod display;
pub mod image;
pub mod menubar;
pub mod noise;
pub mod scheduler;
pub mod sketches;
pub mod surface;
pub mod types;
pub mod utils;

use anyhow::{bail, Result};
use log::warn;

pub use config::SketchConfig;
pub use display::{Display, HeadlessDisplay, TerminalDisplay};
pub use image::{ImageWriter, PngWriter};
pub use noise::Noise;
pub use scheduler::{sketch_fn, Scheduler, SchedulerState, Sketch};
pub use surface::{Paint, Surface};
pub use types::{Color, Signal, Tick};

/// Run `sketch` in the terminal until the user quits.
pub fn run<S: Sketch + ?Sized>(sketch: &mut S, config: &SketchConfig) -> Result<()> {
    config.validate()?;
    let mut surface = Surface::new(config.width, config.height)?;
    let mut display = TerminalDisplay::new(config.key_bindings.clone());
    let mut writer = PngWriter::new(&config.output_dir);
    session(sketch, config, &mut surface, &mut display, &mut writer)
}

/// Run `sketch` for exactly `ticks` ticks with no output device and return
/// the final surface.
pub fn render_headless<S: Sketch + ?Sized>(
    sketch: &mut S,
    config: &SketchConfig,
    ticks: u64,
) -> Result<Surface> {
    if ticks == 0 {
        bail!("Tick count must be positive");
    }
    config.validate()?;
    let mut surface = Surface::new(config.width, config.height)?;
    let mut display = HeadlessDisplay::new().with_tick_limit(ticks);
    let mut writer = PngWriter::new(&config.output_dir);
    session(sketch, config, &mut surface, &mut display, &mut writer)?;
    Ok(surface)
}

/// Open `display`, run the loop, and close it again whatever happened.
fn session<S: Sketch + ?Sized>(
    sketch: &mut S,
    config: &SketchConfig,
    surface: &mut Surface,
    display: &mut dyn Display,
    writer: &mut dyn ImageWriter,
) -> Result<()> {
    display.open(config.width, config.height, &config.title)?;

    let result = Scheduler::new(config.target_fps)
        .map(|s| s.with_save_name(config.title.as_str()))
        .and_then(|mut scheduler| scheduler.run(sketch, surface, display, writer));

    match (result, display.close()) {
        (Err(e), Err(close)) => {
            warn!("closing display failed: {close:#}");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), close) => close,
    }
}
