//! Timing primitives
//!
//! Cooldowns are plain countdowns, not cancellable tasks: the frame loop
//! feeds them delta time and code asks whether they have elapsed.

/// A countdown timer. Starts ready; `arm` restarts the countdown.
#[derive(Debug, Clone)]
pub struct Cooldown {
    duration: f32,
    remaining: f32,
}

impl Cooldown {
    /// Create a cooldown with the given duration in seconds, initially ready.
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
        }
    }

    /// Advance the timer by `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - delta).max(0.0);
        }
    }

    /// Whether the countdown has elapsed.
    pub fn ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Restart the countdown.
    pub fn arm(&mut self) {
        self.remaining = self.duration;
    }

    /// Fire if ready: returns true and re-arms, or false while counting down.
    pub fn try_fire(&mut self) -> bool {
        if self.ready() {
            self.arm();
            true
        } else {
            false
        }
    }
}

/// Accumulates frame deltas and fires once every `interval` seconds.
///
/// Used to run expensive decisions (enemy state re-evaluation) at a lower
/// frequency than the frame tick.
#[derive(Debug, Clone)]
pub struct DecisionClock {
    interval: f32,
    accumulator: f32,
}

impl DecisionClock {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulator: 0.0,
        }
    }

    /// Advance by `delta` seconds. Returns true when a decision is due.
    pub fn tick(&mut self, delta: f32) -> bool {
        self.accumulator += delta;
        if self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            true
        } else {
            false
        }
    }
}
