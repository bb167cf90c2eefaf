//! Countdown state machine
//!
//! The machine is a plain function of `(state, event)`. It never touches the
//! clock or the speaker itself; it hands back [`TimerEffect`]s for the event
//! loop to carry out.

use std::time::Duration;

use tracing::debug;

use super::TimerState;

/// Inputs accepted by the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent {
    /// Begin counting down; ignored when nothing is left on the clock
    Start,
    /// Halt the countdown
    Stop,
    /// One clock pulse worth the given unit interval
    Tick(Duration),
    /// Run the countdown out immediately
    Expire,
    /// Set an absolute remaining time
    SetDuration(Duration),
    /// Set the remaining time as a share of the total duration
    DragUpdate(f64),
}

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEffect {
    StartClock,
    StopClock,
    PlayAlarm,
}

/// Observable phase of the timer
///
/// `Expired` only exists inside a single transition: it is reported on the
/// [`Transition`] that crossed zero and the state it leaves behind is `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Expired,
}

impl TimerPhase {
    pub fn of(state: &TimerState) -> Self {
        if state.is_running() {
            TimerPhase::Running
        } else {
            TimerPhase::Idle
        }
    }
}

/// Result of feeding one event to the machine
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: TimerState,
    pub effects: Vec<TimerEffect>,
    pub expired: bool,
}

impl Transition {
    fn unchanged(state: TimerState) -> Self {
        Self {
            state,
            effects: Vec::new(),
            expired: false,
        }
    }

    /// Phase passed through by this transition
    pub fn phase(&self) -> TimerPhase {
        if self.expired {
            TimerPhase::Expired
        } else {
            TimerPhase::of(&self.state)
        }
    }
}

/// Apply one event to the timer state
pub fn transition(state: TimerState, event: TimerEvent) -> Transition {
    let next = match event {
        TimerEvent::Start => start(state),
        TimerEvent::Stop => stop(state),
        TimerEvent::Tick(unit) => tick(state, unit),
        TimerEvent::Expire => expire(state),
        TimerEvent::SetDuration(value) => set_remaining(state, value),
        TimerEvent::DragUpdate(fraction) => {
            let fraction = clamp_fraction(fraction);
            let total = state.total_duration().get();
            set_remaining(state, total.mul_f64(fraction))
        }
    };

    debug!(
        "{:?}: {:?} -> {:?}, remaining={:.3}s, effects={:?}",
        event,
        TimerPhase::of(&state),
        next.phase(),
        next.state.remaining_time().as_secs_f64(),
        next.effects
    );
    next
}

fn start(state: TimerState) -> Transition {
    if state.is_running() || state.remaining_time().is_zero() {
        return Transition::unchanged(state);
    }

    let mut next = state;
    next.set_running(true);
    Transition {
        state: next,
        effects: vec![TimerEffect::StartClock],
        expired: false,
    }
}

fn stop(state: TimerState) -> Transition {
    let mut next = state;
    next.set_running(false);
    Transition {
        state: next,
        effects: vec![TimerEffect::StopClock],
        expired: false,
    }
}

fn tick(state: TimerState, unit: Duration) -> Transition {
    if !state.is_running() {
        return Transition::unchanged(state);
    }

    let remaining = state.remaining_time().saturating_sub(unit);
    if remaining.is_zero() {
        return expire(state);
    }

    let mut next = state;
    next.set_remaining(remaining);
    Transition::unchanged(next)
}

fn expire(state: TimerState) -> Transition {
    if !state.is_running() {
        return Transition::unchanged(state);
    }

    let mut next = state;
    next.set_remaining(Duration::ZERO);
    next.set_running(false);
    Transition {
        state: next,
        effects: vec![TimerEffect::StopClock, TimerEffect::PlayAlarm],
        expired: true,
    }
}

/// Move the remaining time without touching the running flag, unless the
/// move empties the clock: a running countdown scrubbed to zero halts
/// silently.
fn set_remaining(state: TimerState, value: Duration) -> Transition {
    let was_running = state.is_running();
    let mut next = state;
    next.set_remaining(value);

    let effects = if was_running && !next.is_running() {
        vec![TimerEffect::StopClock]
    } else {
        Vec::new()
    };
    Transition {
        state: next,
        effects,
        expired: false,
    }
}

fn clamp_fraction(fraction: f64) -> f64 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}
