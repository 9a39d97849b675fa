use std::time::{Duration, Instant};

/// Timing snapshot for one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter, wrapping.
    pub frame_index: u64,
}

impl FrameTime {
    /// Delta time in milliseconds, the unit performance budgets use.
    pub fn dt_ms(&self) -> f32 {
        self.dt * 1000.0
    }
}

/// Monotonic per-loop frame clock.
///
/// Delta time is clamped on both ends: the floor keeps tight loops from
/// reporting zero, the ceiling keeps a debugger pause or minimized window
/// from feeding a quarter-hour dt into animation and budget math.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
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
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Re-baselines the clock. Call after resume or surface reconfiguration
    /// so the next dt doesn't cover the gap.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock by one frame.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
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
    fn frame_index_increments_per_tick() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_respects_floor_clamp() {
        let mut clock = FrameClock::new();
        // Back-to-back ticks land under the floor and get clamped up.
        let ft = {
            clock.tick();
            clock.tick()
        };
        assert!(ft.dt >= 0.0001);
    }

    #[test]
    fn dt_respects_ceiling_clamp() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_millis(10));
        clock.last = Instant::now() - Duration::from_secs(5);
        let ft = clock.tick();
        assert!(ft.dt <= 0.0101);
    }

    #[test]
    fn dt_ms_scales_seconds() {
        let ft = FrameTime {
            dt: 0.016,
            now: Instant::now(),
            frame_index: 0,
        };
        assert!((ft.dt_ms() - 16.0).abs() < 1e-4);
    }
}
