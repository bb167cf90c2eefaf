//! Timer state structure and its clamping invariants

use std::time::Duration;

/// A duration that is known to be strictly greater than zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositiveDuration(Duration);

impl PositiveDuration {
    /// Wrap a duration, rejecting zero
    pub fn new(duration: Duration) -> Option<Self> {
        if duration.is_zero() {
            None
        } else {
            Some(Self(duration))
        }
    }

    pub fn from_secs(seconds: u64) -> Option<Self> {
        Self::new(Duration::from_secs(seconds))
    }

    /// Build from fractional seconds, rejecting non-finite and non-positive values
    pub fn from_secs_f64(seconds: f64) -> Option<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(seconds).ok().and_then(Self::new)
    }

    pub fn get(self) -> Duration {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }
}

impl From<PositiveDuration> for Duration {
    fn from(value: PositiveDuration) -> Self {
        value.0
    }
}

/// Countdown state owned by the timer event loop
///
/// `remaining_time` always lies in `[0, total_duration]`, and the timer is
/// never running with nothing left on the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    total_duration: PositiveDuration,
    remaining_time: Duration,
    is_running: bool,
}

impl TimerState {
    /// Create an idle timer with the full duration remaining
    pub fn new(total_duration: PositiveDuration) -> Self {
        Self {
            total_duration,
            remaining_time: total_duration.get(),
            is_running: false,
        }
    }

    pub fn total_duration(&self) -> PositiveDuration {
        self.total_duration
    }

    pub fn remaining_time(&self) -> Duration {
        self.remaining_time
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Set the remaining time, clamped to the total duration.
    ///
    /// Running out of time this way halts the countdown.
    pub(super) fn set_remaining(&mut self, remaining: Duration) {
        self.remaining_time = remaining.min(self.total_duration.get());
        if self.remaining_time.is_zero() {
            self.is_running = false;
        }
    }

    /// Set the running flag; refused while nothing is left on the clock
    pub(super) fn set_running(&mut self, running: bool) {
        self.is_running = running && !self.remaining_time.is_zero();
    }

    /// Read-only snapshot for rendering
    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            remaining_time: self.remaining_time,
            total_duration: self.total_duration.get(),
            is_running: self.is_running,
        }
    }
}

/// Snapshot of the timer handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub remaining_time: Duration,
    pub total_duration: Duration,
    pub is_running: bool,
}

impl DisplayState {
    /// Remaining time as a share of the total duration
    pub fn fraction(&self) -> f64 {
        if self.total_duration.is_zero() {
            return 0.0;
        }
        self.remaining_time.as_secs_f64() / self.total_duration.as_secs_f64()
    }
}
