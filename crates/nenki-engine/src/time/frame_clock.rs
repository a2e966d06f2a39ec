use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    /// Timestamp the tick was taken at.
    pub now: Instant,
    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots from platform timestamps.
///
/// Delta time is clamped so a stalled loop (debugger, minimised window)
/// does not produce a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self { last: None, frame_index: 0, dt_min, dt_max }
    }

    /// Forgets the previous timestamp; the next tick reports `dt_min`.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).clamp(self.dt_min, self.dt_max),
            None => self.dt_min,
        };
        self.last = Some(now);

        let ft = FrameTime { dt: dt.as_secs_f32(), now, frame_index: self.frame_index };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Advances the clock to the current instant.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
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
    fn first_tick_uses_min_dt() {
        let mut clock = FrameClock::new();
        let t = clock.tick_at(Instant::now());
        assert_eq!(t.frame_index, 0);
        assert!((t.dt - 0.0001).abs() < 1e-6);
    }

    #[test]
    fn dt_is_clamped_after_stall() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let t = clock.tick_at(t0 + Duration::from_secs(5));
        assert_eq!(t.frame_index, 1);
        assert!((t.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn regular_step_is_reported() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let t = clock.tick_at(t0 + Duration::from_millis(16));
        assert!((t.dt - 0.016).abs() < 1e-4);
    }
}
