//! Countdown timer stepped by the per-frame delta.
//!
//! Replaces "wait N seconds then continue" continuations with explicit state
//! that the owning system advances once per tick.

/// Counts down from a duration to zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
}

impl Countdown {
    /// Starts a countdown of `seconds`; negative or non-finite values start
    /// an already expired timer.
    #[must_use]
    pub fn start(seconds: f32) -> Self {
        let duration = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };
        Self {
            duration,
            remaining: duration,
        }
    }

    /// Advances the countdown by `delta` seconds.
    ///
    /// Returns `true` on the tick the countdown reaches zero and on every
    /// later tick.
    pub fn tick(&mut self, delta: f32) -> bool {
        if delta.is_finite() && delta > 0.0 {
            self.remaining = (self.remaining - delta).max(0.0);
        }
        self.is_expired()
    }

    /// Whether the countdown has reached zero.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Seconds left before expiry.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Seconds elapsed since the countdown started.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.duration - self.remaining
    }

    /// Rewinds to the full duration.
    pub fn restart(&mut self) {
        self.remaining = self.duration;
    }
}
