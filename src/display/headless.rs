use std::collections::VecDeque;

use anyhow::Result;

use crate::surface::Surface;
use crate::types::{FrameStatus, Signal};

use super::Display;

/// A display with no output device.
///
/// Replays a fixed script of signals, one per poll, then reports
/// `Signal::None`. With a tick limit it reports `Signal::Quit` on the
/// limit-th poll regardless of the script.
///
/// Only the latest status is kept unless the full history is requested with
/// [`HeadlessDisplay::with_status_history`].
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    script: VecDeque<Signal>,
    tick_limit: Option<u64>,
    polls: u64,
    presented: u64,
    last_frame: Option<Surface>,
    last_status: Option<FrameStatus>,
    history: Option<Vec<FrameStatus>>,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, signals: impl IntoIterator<Item = Signal>) -> Self {
        self.script.extend(signals);
        self
    }

    pub fn with_tick_limit(mut self, ticks: u64) -> Self {
        self.tick_limit = Some(ticks);
        self
    }

    /// Record every status received, not just the latest.
    pub fn with_status_history(mut self) -> Self {
        self.history.get_or_insert_with(Vec::new);
        self
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Copy of the surface as of the latest `present`.
    pub fn last_frame(&self) -> Option<&Surface> {
        self.last_frame.as_ref()
    }

    pub fn last_status(&self) -> Option<&FrameStatus> {
        self.last_status.as_ref()
    }

    /// Every status received, in order. Empty unless history was enabled.
    pub fn statuses(&self) -> &[FrameStatus] {
        self.history.as_deref().unwrap_or_default()
    }
}

impl Display for HeadlessDisplay {
    fn present(&mut self, surface: &Surface, status: &FrameStatus) -> Result<()> {
        self.presented += 1;
        self.last_status = Some(*status);
        if let Some(history) = &mut self.history {
            history.push(*status);
        }
        match &mut self.last_frame {
            Some(frame) => frame.clone_from(surface),
            None => self.last_frame = Some(surface.clone()),
        }
        Ok(())
    }

    fn poll_signal(&mut self) -> Result<Signal> {
        self.polls += 1;
        if self.tick_limit.is_some_and(|limit| self.polls >= limit) {
            return Ok(Signal::Quit);
        }
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn status() -> FrameStatus {
        FrameStatus {
            frame: 0,
            looping: true,
            fps: 0.0,
        }
    }

    #[test]
    fn replays_script_then_none() {
        let mut d = HeadlessDisplay::new().with_script([Signal::SaveFrame, Signal::ToggleLoop]);
        assert_eq!(d.poll_signal().unwrap(), Signal::SaveFrame);
        assert_eq!(d.poll_signal().unwrap(), Signal::ToggleLoop);
        assert_eq!(d.poll_signal().unwrap(), Signal::None);
    }

    #[test]
    fn tick_limit_quits_on_last_poll() {
        let mut d = HeadlessDisplay::new().with_tick_limit(3);
        assert_eq!(d.poll_signal().unwrap(), Signal::None);
        assert_eq!(d.poll_signal().unwrap(), Signal::None);
        assert_eq!(d.poll_signal().unwrap(), Signal::Quit);
    }

    #[test]
    fn keeps_last_presented_frame() {
        let mut d = HeadlessDisplay::new();
        let mut s = Surface::new(2, 2).unwrap();
        d.present(&s, &status()).unwrap();
        s.set_pixel(1, 1, crate::types::Color::WHITE);
        d.present(&s, &status()).unwrap();
        assert_eq!(d.presented(), 2);
        assert_eq!(d.last_frame().unwrap().pixel(1, 1), Some([255, 255, 255]));
        assert!(d.statuses().is_empty());
    }

    #[test]
    fn status_history_is_opt_in() {
        let mut plain = HeadlessDisplay::new();
        let mut recording = HeadlessDisplay::new().with_status_history();
        let s = Surface::new(1, 1).unwrap();
        for frame in 1..=3 {
            let st = FrameStatus { frame, ..status() };
            plain.present(&s, &st).unwrap();
            recording.present(&s, &st).unwrap();
        }
        assert!(plain.statuses().is_empty());
        assert_eq!(plain.last_status().unwrap().frame, 3);
        let frames: Vec<u64> = recording.statuses().iter().map(|s| s.frame).collect();
        assert_eq!(frames, vec![1, 2, 3]);
    }
}
