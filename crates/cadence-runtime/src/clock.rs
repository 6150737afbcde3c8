//! Frame clock with fixed-timestep accumulator

use crate::config::DispatcherConfig;
use std::time::Instant;

/// Tracks frame time and accumulates it into fixed steps for `FixedUpdate`
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Fixed timestep interval (default: 1/60 second)
    pub fixed_timestep: f64,
    /// Frame deltas are clamped to this (default: 250ms)
    pub max_frame_time: f64,
    /// Frames advanced so far
    pub frame_count: u64,
    accumulator: f64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::from_config(&DispatcherConfig::default())
    }
}

impl FrameClock {
    /// Create a new clock with default 60Hz fixed timestep
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            fixed_timestep: config.fixed_timestep(),
            max_frame_time: config.max_frame_time,
            frame_count: 0,
            accumulator: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }

    /// Advance from the wall clock. Call once per frame; the first call yields a zero delta.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.advance(0.0);
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Advance by an explicit elapsed time, for headless or deterministic loops
    pub fn advance(&mut self, elapsed: f64) {
        // Clamp to avoid spiral of death; a non-positive limit disables it
        let limit = if self.max_frame_time > 0.0 {
            self.max_frame_time
        } else {
            f64::INFINITY
        };
        self.delta_time = elapsed.clamp(0.0, limit);
        self.total_time += self.delta_time;
        self.accumulator += self.delta_time;
        self.frame_count += 1;
    }

    /// Returns true if there's enough accumulated time for a fixed update step.
    /// Always false for a non-positive or NaN timestep.
    pub fn should_fixed_update(&self) -> bool {
        self.fixed_timestep > 0.0 && self.accumulator >= self.fixed_timestep
    }

    /// Consume one fixed timestep from the accumulator
    pub fn consume_fixed_step(&mut self) {
        self.accumulator -= self.fixed_timestep;
    }
}
