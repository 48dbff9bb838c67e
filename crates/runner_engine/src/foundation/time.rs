//! Time management utilities
//!
//! Everything here is advanced by the host's per-frame delta; nothing reads a
//! wall clock. Pausing the game simply stops feeding deltas in.

/// One-shot countdown for timed effects (power-ups, cooldowns, UI decorations)
///
/// Restarting replaces the running countdown, so the latest start always wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
}

impl Countdown {
    /// Create a running countdown
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            remaining: duration,
        }
    }

    /// Advance by `delta_time`; returns `true` exactly once, on the tick it reaches zero
    pub fn tick(&mut self, delta_time: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining -= delta_time;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            true
        } else {
            false
        }
    }

    /// Seconds left
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Total duration this countdown was started with
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Remaining fraction, 1 at start down to 0 at expiry
    pub fn fraction_remaining(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (self.remaining / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Whether the countdown has run out
    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Accumulates elapsed game time against a fixed interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    interval: f32,
    elapsed: f32,
}

impl IntervalTimer {
    /// Create a timer that becomes ready after `interval` seconds
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Accumulate time; the accumulator is not capped at the interval
    pub fn accumulate(&mut self, delta_time: f32) {
        self.elapsed += delta_time;
    }

    /// Whether the accumulated time has reached the interval
    pub fn is_ready(&self) -> bool {
        self.elapsed >= self.interval
    }

    /// Clear the accumulator
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Accumulated seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Configured interval
    pub fn interval(&self) -> f32 {
        self.interval
    }
}
