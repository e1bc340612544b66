use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds (clamped).
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Average frame rate over a reporting window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameRate {
    pub frames: u32,
    pub elapsed: Duration,
}

impl FrameRate {
    pub fn fps(&self) -> f64 {
        if self.elapsed.is_zero() {
            return 0.0;
        }
        self.frames as f64 / self.elapsed.as_secs_f64()
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped to avoid pathological values when the process is
/// stopped by a debugger or the window is minimized.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,

    window_start: Instant,
    window_frames: u32,
    report_every: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
            window_start: now,
            window_frames: 0,
            report_every: Duration::from_secs(5),
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;
        self.window_frames = self.window_frames.saturating_add(1);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Returns the frame rate of the elapsed reporting window once it is
    /// complete, and starts a new window.
    pub fn take_frame_rate(&mut self, now: Instant) -> Option<FrameRate> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.report_every {
            return None;
        }
        let rate = FrameRate {
            frames: self.window_frames,
            elapsed,
        };
        self.window_start = now;
        self.window_frames = 0;
        Some(rate)
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
    fn frame_index_counts_from_zero() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        assert_eq!(clock.tick_at(start).frame_index, 0);
        assert_eq!(clock.tick_at(start).frame_index, 1);
        assert_eq!(clock.tick_at(start).frame_index, 2);
    }

    #[test]
    fn dt_is_clamped_to_bounds() {
        let mut clock =
            FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        let start = clock.last;

        let ft = clock.tick_at(start);
        assert_eq!(ft.dt, Duration::from_millis(1).as_secs_f32());

        let ft = clock.tick_at(start + Duration::from_secs(3));
        assert_eq!(ft.dt, Duration::from_millis(100).as_secs_f32());
    }

    #[test]
    fn frame_rate_reported_once_per_window() {
        let mut clock = FrameClock::new();
        let start = clock.window_start;
        for i in 0..10 {
            clock.tick_at(start + Duration::from_millis(i * 10));
        }
        assert!(clock.take_frame_rate(start + Duration::from_secs(1)).is_none());

        let rate = clock
            .take_frame_rate(start + Duration::from_secs(5))
            .unwrap();
        assert_eq!(rate.frames, 10);
        assert!((rate.fps() - 2.0).abs() < 1e-9);

        assert!(clock.take_frame_rate(start + Duration::from_secs(6)).is_none());
    }
}
