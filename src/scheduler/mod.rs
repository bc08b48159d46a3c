//! Scheduler: the fixed-cadence setup/draw loop.
//!
//! Calls `Sketch::setup` once, then ticks until the display reports a quit.
//! Each tick measures `dt`, runs `Sketch::draw` if the loop is not paused,
//! presents the surface, and handles one display signal. The frame index
//! only moves on ticks that actually draw.
//!
//! The scheduler never touches a terminal or a file itself; it goes through
//! the `Display` and `ImageWriter` traits.

mod sketch;
mod timer;

use anyhow::{bail, Result};
use log::{debug, info, warn};

pub use sketch::{sketch_fn, FnSketch, Sketch};
pub use timer::{frame_period, FrameTimer};

use crate::display::Display;
use crate::image::ImageWriter;
use crate::surface::Surface;
use crate::types::{FrameStatus, Signal, Tick};

// ---------------------------------------------------------------------------
// Loop state
// ---------------------------------------------------------------------------

/// Frame counter plus the pausable looping flag.
///
/// Sketches get `&mut SchedulerState` in both hooks but can only change the
/// flag; the counter belongs to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerState {
    frame_index: u64,
    looping: bool,
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self {
            frame_index: 0,
            looping: true,
        }
    }
}

impl SchedulerState {
    /// Number of draws so far. The value handed to the n-th draw is `n`.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Stop calling `draw`. Presentation and input polling continue.
    pub fn pause(&mut self) {
        if self.looping {
            debug!("loop paused at frame {}", self.frame_index);
        }
        self.looping = false;
    }

    pub fn resume(&mut self) {
        if !self.looping {
            debug!("loop resumed at frame {}", self.frame_index);
        }
        self.looping = true;
    }

    pub fn toggle(&mut self) {
        if self.looping {
            self.pause();
        } else {
            self.resume();
        }
    }

    fn advance(&mut self) -> u64 {
        self.frame_index += 1;
        self.frame_index
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Terminated,
}

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Scheduler {
    state: SchedulerState,
    timer: FrameTimer,
    phase: Phase,
    save_name: String,
    last_dt_secs: f32,
}

impl Scheduler {
    /// `target_fps` must be positive, finite, and give a representable period.
    pub fn new(target_fps: f64) -> Result<Self> {
        Ok(Self {
            state: SchedulerState::default(),
            timer: FrameTimer::new(target_fps)?,
            phase: Phase::Uninitialized,
            save_name: "kanvas".into(),
            last_dt_secs: 0.0,
        })
    }

    /// Base name handed to the image writer on a save request.
    pub fn with_save_name(mut self, name: impl Into<String>) -> Self {
        self.save_name = name.into();
        self
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SchedulerState {
        &mut self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn frame_index(&self) -> u64 {
        self.state.frame_index
    }

    pub fn is_looping(&self) -> bool {
        self.state.looping
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn resume(&mut self) {
        self.state.resume();
    }

    /// Run `setup` and move to `Running`. Fails if already started.
    pub fn start<S: Sketch + ?Sized>(&mut self, sketch: &mut S, surface: &mut Surface) -> Result<()> {
        if self.phase != Phase::Uninitialized {
            bail!("Scheduler already started ({:?})", self.phase);
        }
        if let Err(e) = sketch.setup(surface, &mut self.state) {
            self.phase = Phase::Terminated;
            return Err(e.context("setup failed"));
        }
        self.phase = Phase::Running;
        self.timer.reset();
        info!(
            "setup complete on {}x{} surface, ticking every {:?}",
            surface.width(),
            surface.height(),
            self.timer.period()
        );
        Ok(())
    }

    /// One loop iteration, without throttling.
    pub fn tick<S: Sketch + ?Sized>(
        &mut self,
        sketch: &mut S,
        surface: &mut Surface,
        display: &mut dyn Display,
        writer: &mut dyn ImageWriter,
    ) -> Result<Flow> {
        if self.phase != Phase::Running {
            bail!("Scheduler is not running ({:?})", self.phase);
        }

        let dt = self.timer.update();
        self.last_dt_secs = dt.as_secs_f32();

        if self.state.looping {
            let frame = self.state.advance();
            if let Err(e) = sketch.draw(surface, Tick { frame, dt }, &mut self.state) {
                self.phase = Phase::Terminated;
                return Err(e.context(format!("draw failed at frame {frame}")));
            }
        }

        let status = self.status();
        if let Err(e) = display.present(surface, &status) {
            self.phase = Phase::Terminated;
            return Err(e.context("presenting frame failed"));
        }

        let signal = match display.poll_signal() {
            Ok(signal) => signal,
            Err(e) => {
                self.phase = Phase::Terminated;
                return Err(e.context("polling display failed"));
            }
        };

        match signal {
            Signal::None => {}
            Signal::Quit => {
                info!("quit requested after frame {}", self.state.frame_index);
                self.phase = Phase::Terminated;
                return Ok(Flow::Quit);
            }
            Signal::SaveFrame => match writer.save(surface, &self.save_name) {
                Ok(path) => info!("frame saved to {}", path.display()),
                Err(e) => warn!("saving frame failed: {e:#}"),
            },
            Signal::ToggleLoop => self.state.toggle(),
        }

        Ok(Flow::Continue)
    }

    /// `start`, then tick and throttle until quit or failure.
    pub fn run<S: Sketch + ?Sized>(
        &mut self,
        sketch: &mut S,
        surface: &mut Surface,
        display: &mut dyn Display,
        writer: &mut dyn ImageWriter,
    ) -> Result<()> {
        self.start(sketch, surface)?;
        loop {
            match self.tick(sketch, surface, display, writer)? {
                Flow::Continue => self.timer.limit_frame_rate(),
                Flow::Quit => return Ok(()),
            }
        }
    }

    fn status(&self) -> FrameStatus {
        FrameStatus {
            frame: self.state.frame_index,
            looping: self.state.looping,
            fps: if self.last_dt_secs > 0.0 {
                1.0 / self.last_dt_secs
            } else {
                0.0
            },
        }
    }
}
