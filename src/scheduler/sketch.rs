use anyhow::Result;

use crate::surface::Surface;
use crate::types::Tick;

use super::SchedulerState;

/// User code driven by the scheduler: `setup` once, then `draw` every
/// looping tick.
///
/// Both hooks get the loop state so a sketch can pause or resume itself.
/// An `Err` from either hook ends the session.
pub trait Sketch {
    fn setup(&mut self, surface: &mut Surface, state: &mut SchedulerState) -> Result<()> {
        let _ = (surface, state);
        Ok(())
    }

    fn draw(&mut self, surface: &mut Surface, tick: Tick, state: &mut SchedulerState) -> Result<()>;
}

impl<T: Sketch + ?Sized> Sketch for Box<T> {
    fn setup(&mut self, surface: &mut Surface, state: &mut SchedulerState) -> Result<()> {
        (**self).setup(surface, state)
    }

    fn draw(&mut self, surface: &mut Surface, tick: Tick, state: &mut SchedulerState) -> Result<()> {
        (**self).draw(surface, tick, state)
    }
}

/// A sketch built from a pair of closures.
pub struct FnSketch<S, D> {
    setup: Option<S>,
    draw: D,
}

/// Wrap `setup` / `draw` closures as a [`Sketch`].
pub fn sketch_fn<S, D>(setup: S, draw: D) -> FnSketch<S, D>
where
    S: FnOnce(&mut Surface) -> Result<()>,
    D: FnMut(&mut Surface, Tick) -> Result<()>,
{
    FnSketch {
        setup: Some(setup),
        draw,
    }
}

impl<S, D> Sketch for FnSketch<S, D>
where
    S: FnOnce(&mut Surface) -> Result<()>,
    D: FnMut(&mut Surface, Tick) -> Result<()>,
{
    fn setup(&mut self, surface: &mut Surface, _state: &mut SchedulerState) -> Result<()> {
        match self.setup.take() {
            Some(setup) => setup(surface),
            None => Ok(()),
        }
    }

    fn draw(&mut self, surface: &mut Surface, tick: Tick, _state: &mut SchedulerState) -> Result<()> {
        (self.draw)(surface, tick)
    }
}
