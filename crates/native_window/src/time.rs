//! Time utilities for caller-paced poll loops

use std::time::{Duration, Instant};

/// Block the calling thread for the given number of milliseconds
pub fn sleep(milliseconds: u32) {
    std::thread::sleep(Duration::from_millis(u64::from(milliseconds)));
}

/// Counts frames and measures the time between them
pub struct FrameClock {
    started: Instant,
    last_tick: Instant,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Start a clock at frame zero
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_tick: now,
            frames: 0,
        }
    }

    /// Mark the end of a frame and return its duration
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.frames += 1;
        delta
    }

    /// Frames ticked so far
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Time since the clock started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Average frames per second since the clock started
    pub fn average_fps(&self) -> f64 {
        let seconds = self.elapsed().as_secs_f64();
        if seconds > 0.0 {
            self.frames as f64 / seconds
        } else {
            0.0
        }
    }
}
