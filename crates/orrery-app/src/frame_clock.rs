//! Per-frame timing.
//!
//! Orbits are evaluated at wall-clock time since startup. Camera motion uses
//! the frame delta, clamped so a stall (window drag, breakpoint) does not
//! teleport the camera.

use std::time::{Duration, Instant};

use tracing::warn;

/// Maximum frame delta fed to per-frame motion.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f64,
    /// Clamped time since the previous tick.
    pub delta: Duration,
}

impl FrameTime {
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    previous: Instant,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            previous: start,
            frame_count: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advance to `now`. Times earlier than the previous tick yield a zero delta.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let raw = now.saturating_duration_since(self.previous);
        self.previous = now.max(self.previous);
        self.frame_count += 1;

        let delta = if raw > MAX_FRAME_DELTA {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                raw.as_secs_f64() * 1000.0,
                MAX_FRAME_DELTA.as_secs_f64() * 1000.0
            );
            MAX_FRAME_DELTA
        } else {
            raw
        };

        FrameTime {
            elapsed: self.previous.duration_since(self.start).as_secs_f64(),
            delta,
        }
    }

    pub fn uptime(&self) -> Duration {
        self.previous.duration_since(self.start)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_and_elapsed() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let t = clock.tick_at(start + Duration::from_millis(16));
        assert_eq!(t.delta, Duration::from_millis(16));
        assert!((t.elapsed - 0.016).abs() < 1e-9);

        let t = clock.tick_at(start + Duration::from_millis(40));
        assert_eq!(t.delta, Duration::from_millis(24));
        assert!((t.elapsed - 0.040).abs() < 1e-9);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_long_frame_is_clamped_but_elapsed_is_not() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let t = clock.tick_at(start + Duration::from_secs(2));
        assert_eq!(t.delta, MAX_FRAME_DELTA);
        assert!((t.elapsed - 2.0).abs() < 1e-9);
        assert_eq!(clock.uptime(), Duration::from_secs(2));
    }

    #[test]
    fn test_time_going_backwards_gives_zero_delta() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start + Duration::from_millis(100));
        let t = clock.tick_at(start);
        assert_eq!(t.delta, Duration::ZERO);
        assert_eq!(t.elapsed, 0.0);
    }

    #[test]
    fn test_delta_seconds() {
        let t = FrameTime {
            elapsed: 0.0,
            delta: Duration::from_millis(500),
        };
        assert_eq!(t.delta_seconds(), 0.5);
    }
}
