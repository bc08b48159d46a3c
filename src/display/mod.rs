//! Display: the presentation boundary.
//!
//! A display shows the surface once per tick and reports at most one
//! discrete [`Signal`] back to the scheduler. It only ever reads the surface.

mod headless;
mod terminal;

use anyhow::Result;

pub use headless::HeadlessDisplay;
pub use terminal::TerminalDisplay;

use crate::surface::Surface;
use crate::types::{FrameStatus, Signal};

pub trait Display {
    /// Acquire whatever the display needs (window, raw terminal, ...).
    fn open(&mut self, width: u32, height: u32, title: &str) -> Result<()> {
        let _ = (width, height, title);
        Ok(())
    }

    fn present(&mut self, surface: &Surface, status: &FrameStatus) -> Result<()>;

    /// Non-blocking; called once per tick after `present`.
    fn poll_signal(&mut self) -> Result<Signal>;

    /// Release what `open` acquired. Called even when the session fails.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
