//! Time management utilities

use std::time::Instant;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed-timestep accumulator
///
/// Converts variable wall-clock frame deltas into zero or more fixed
/// simulation steps at a constant tick rate. The scene orchestrator uses
/// this to keep gameplay ticks deterministic regardless of frame rate.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator ticking at `tick_rate` steps per second
    pub fn new(tick_rate: f32) -> Self {
        let rate = if tick_rate > 0.0 {
            tick_rate
        } else {
            log::warn!("invalid tick rate {tick_rate}, falling back to 60");
            60.0
        };
        Self {
            step: 1.0 / rate,
            accumulator: 0.0,
        }
    }

    /// Duration of one fixed step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed a wall-clock delta and return how many fixed steps are due
    pub fn advance(&mut self, delta: f32) -> u32 {
        self.accumulator += delta.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_whole_steps() {
        let mut ts = FixedTimestep::new(10.0); // 0.1s per step
        assert_eq!(ts.advance(0.05), 0);
        assert_eq!(ts.advance(0.05), 1);
        assert_eq!(ts.advance(0.35), 3);
    }

    #[test]
    fn invalid_rate_falls_back() {
        let ts = FixedTimestep::new(0.0);
        assert!((ts.step() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut ts = FixedTimestep::new(10.0);
        assert_eq!(ts.advance(-1.0), 0);
        assert_eq!(ts.advance(0.1), 1);
    }
}
