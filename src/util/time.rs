//! Time utilities for the frame loop and the button pad

use std::time::{Duration, Instant};

/// Default frame rate of the host game loop
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Duration of one frame at the given rate
pub fn frame_duration(frame_rate: u32) -> Duration {
    Duration::from_micros(1_000_000 / frame_rate.max(1) as u64)
}

/// Calculate delta time for one frame (in seconds)
pub fn frame_delta(frame_rate: u32) -> f32 {
    1.0 / frame_rate.max(1) as f32
}

/// Wrapping millisecond tick counter, as kept by a microcontroller.
///
/// The counter rolls over after ~49 days; differences are computed with
/// wrapping subtraction so a roll-over between two samples is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Millis(pub u32);

impl Millis {
    /// Milliseconds elapsed from `earlier` to `self`
    pub fn since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    pub fn add(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_add(ms))
    }
}

/// Source of monotonic millisecond ticks
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Clock backed by [`Instant`], started at construction
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Millis {
        // Truncation is the roll-over
        Millis(self.start.elapsed().as_millis() as u32)
    }
}
