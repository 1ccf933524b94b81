//! Time management utilities
//!
//! The simulation only ever advances in whole fixed ticks. `FixedTimestep`
//! converts variable frame time into a bounded number of ticks, `Stopwatch`
//! measures wall time for diagnostics.

use std::time::{Duration, Instant};

/// Accumulates frame time and hands out fixed-size ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
    tick_count: u64,
}

impl FixedTimestep {
    /// Create a fixed-step clock
    ///
    /// `max_steps` caps how many ticks a single long frame may produce so a
    /// stall does not turn into a spiral of catch-up ticks.
    pub fn new(step: f32, max_steps: u32) -> Self {
        Self {
            step,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            tick_count: 0,
        }
    }

    /// Tick length in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add elapsed frame time and return the number of ticks to run
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        if !(frame_time.is_finite() && frame_time > 0.0) {
            return 0;
        }
        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps {
            // Drop the backlog rather than carrying it into the next frame
            self.accumulator = self.accumulator.min(self.step);
        }
        self.tick_count += u64::from(steps);
        steps
    }

    /// Fraction of a tick left in the accumulator, for interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Total ticks handed out so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

/// Simple stopwatch for measuring elapsed time
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Elapsed time, including the running lap
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map_or(self.elapsed, |start| self.elapsed + start.elapsed())
    }
}
