use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};

/// Tick period for `target_fps`. The rate must be positive, finite, and
/// large enough that one period fits in a `Duration`.
pub fn frame_period(target_fps: f64) -> Result<Duration> {
    if !(target_fps.is_finite() && target_fps > 0.0) {
        bail!("Target frame rate must be positive, got {target_fps}");
    }
    match Duration::try_from_secs_f64(1.0 / target_fps) {
        Ok(period) => Ok(period),
        Err(_) => bail!("Target frame rate {target_fps} is too low"),
    }
}

/// Measures tick-to-tick time and throttles toward a target rate.
///
/// Throttling sleeps only for what is left of the current period, so a slow
/// tick is simply late; it never builds up debt to be paid back later.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    period: Duration,
    last: Instant,
}

impl FrameTimer {
    pub fn new(target_fps: f64) -> Result<Self> {
        Ok(Self {
            period: frame_period(target_fps)?,
            last: Instant::now(),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Restart the measurement window without reporting a delta.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Time since the previous call (or since construction / `reset`).
    pub fn update(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt
    }

    /// How much of the current period is left.
    pub fn remaining(&self) -> Duration {
        self.period.saturating_sub(self.last.elapsed())
    }

    /// Sleep out the rest of the current period, if any.
    pub fn limit_frame_rate(&self) {
        let rest = self.remaining();
        if !rest.is_zero() {
            thread::sleep(rest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn period_from_rate() {
        assert_eq!(FrameTimer::new(50.0).unwrap().period(), Duration::from_millis(20));
        assert_eq!(FrameTimer::new(1.0).unwrap().period(), Duration::from_secs(1));
    }

    #[test]
    fn unrepresentable_period_is_an_error() {
        assert!(frame_period(1e-30).is_err());
        assert!(FrameTimer::new(f64::MIN_POSITIVE).is_err());
        assert!(frame_period(0.0).is_err());
        assert_eq!(frame_period(0.001).unwrap(), Duration::from_secs(1000));
    }

    #[test]
    fn update_measures_elapsed_time() {
        let mut t = FrameTimer::new(60.0).unwrap();
        thread::sleep(Duration::from_millis(5));
        let first = t.update();
        assert!(first >= Duration::from_millis(5));
        // The window restarts, so an immediate second update is shorter.
        assert!(t.update() < first);
    }

    #[test]
    fn limit_waits_out_the_period() {
        let mut t = FrameTimer::new(100.0).unwrap();
        t.reset();
        let start = Instant::now();
        t.limit_frame_rate();
        assert!(start.elapsed() >= Duration::from_millis(8));
    }

    #[test]
    fn late_tick_does_not_sleep() {
        let t = FrameTimer::new(1000.0).unwrap();
        thread::sleep(Duration::from_millis(5));
        assert_eq!(t.remaining(), Duration::ZERO);
        let start = Instant::now();
        t.limit_frame_rate();
        assert!(start.elapsed() < Duration::from_millis(5));
    }
}
