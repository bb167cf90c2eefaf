//! Timer core: entry points used by the clock and the presentation layer

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use super::{
    transition, DisplayState, PositiveDuration, PresetSelector, TimerEvent, TimerState, Transition,
};
use crate::scrubber::{DragSession, ScrubberGeometry};

/// User intents delivered to the core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerInput {
    StartStop,
    Start,
    Stop,
    Preset(usize),
    SetDuration(Duration),
    DragBegin { pointer_x: f64, track_width: f64 },
    DragMove { pointer_x: f64, track_width: f64 },
    DragEnd,
}

impl TimerInput {
    /// Short name used for last-action tracking
    pub fn name(&self) -> &'static str {
        match self {
            TimerInput::StartStop => "start-stop",
            TimerInput::Start => "start",
            TimerInput::Stop => "stop",
            TimerInput::Preset(_) => "preset",
            TimerInput::SetDuration(_) => "set-duration",
            TimerInput::DragBegin { .. } => "drag-begin",
            TimerInput::DragMove { .. } => "drag-move",
            TimerInput::DragEnd => "drag-end",
        }
    }
}

/// Inputs the core refuses outright
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("No preset at index {0}")]
    UnknownPreset(usize),
}

/// Owns the timer state, the preset set and any active drag session
#[derive(Debug, Clone)]
pub struct TimerCore {
    state: TimerState,
    presets: PresetSelector,
    drag: Option<DragSession>,
    unit_interval: Duration,
}

impl TimerCore {
    pub fn new(total_duration: PositiveDuration, presets: PresetSelector, unit_interval: Duration) -> Self {
        Self {
            state: TimerState::new(total_duration),
            presets,
            drag: None,
            unit_interval,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn presets(&self) -> &PresetSelector {
        &self.presets
    }

    pub fn unit_interval(&self) -> Duration {
        self.unit_interval
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn current_display_state(&self) -> DisplayState {
        self.state.display_state()
    }

    /// Clock pulse
    pub fn on_tick(&mut self) -> Transition {
        let t = self.apply(TimerEvent::Tick(self.unit_interval));
        if t.expired {
            info!("Countdown expired");
        }
        t
    }

    pub fn on_start_stop_pressed(&mut self) -> Transition {
        if self.state.is_running() {
            self.on_stop_pressed()
        } else {
            self.on_start_pressed()
        }
    }

    pub fn on_start_pressed(&mut self) -> Transition {
        let t = self.apply(TimerEvent::Start);
        if t.state.is_running() {
            info!(
                "Countdown started with {:.0}s remaining",
                t.state.remaining_time().as_secs_f64()
            );
        } else {
            debug!("Start ignored, nothing left on the clock");
        }
        t
    }

    pub fn on_stop_pressed(&mut self) -> Transition {
        info!("Countdown stopped");
        self.apply(TimerEvent::Stop)
    }

    pub fn on_preset_pressed(&mut self, index: usize) -> Result<Transition, InputError> {
        let event = self
            .presets
            .select(index)
            .ok_or(InputError::UnknownPreset(index))?;
        info!("Preset {} selected", index);
        Ok(self.apply(event))
    }

    pub fn on_set_duration(&mut self, remaining: Duration) -> Transition {
        self.apply(TimerEvent::SetDuration(remaining))
    }

    /// Pointer-down on the scrubber track
    pub fn on_drag_began(&mut self, pointer_x: f64, track_width: f64) -> Transition {
        let session = DragSession::begin(pointer_x, ScrubberGeometry::new(track_width));
        debug!("Drag began at fraction {:.4}", session.last_fraction());
        self.drag = Some(session);
        self.apply(TimerEvent::DragUpdate(session.last_fraction()))
    }

    /// Pointer-move sample; opens a session if none is active
    pub fn on_drag_changed(&mut self, pointer_x: f64, track_width: f64) -> Transition {
        let geometry = ScrubberGeometry::new(track_width);
        let fraction = match self.drag.as_mut() {
            Some(session) => session.update(pointer_x, geometry),
            None => {
                let session = DragSession::begin(pointer_x, geometry);
                self.drag = Some(session);
                session.last_fraction()
            }
        };
        self.apply(TimerEvent::DragUpdate(fraction))
    }

    /// Pointer-up; the session is discarded
    pub fn on_drag_ended(&mut self) -> Transition {
        if let Some(session) = self.drag.take() {
            debug!("Drag ended at fraction {:.4}", session.end());
        }
        self.apply_nothing()
    }

    /// Route a user input to its entry point
    pub fn handle(&mut self, input: TimerInput) -> Result<Transition, InputError> {
        let t = match input {
            TimerInput::StartStop => self.on_start_stop_pressed(),
            TimerInput::Start => self.on_start_pressed(),
            TimerInput::Stop => self.on_stop_pressed(),
            TimerInput::Preset(index) => self.on_preset_pressed(index)?,
            TimerInput::SetDuration(remaining) => self.on_set_duration(remaining),
            TimerInput::DragBegin { pointer_x, track_width } => self.on_drag_began(pointer_x, track_width),
            TimerInput::DragMove { pointer_x, track_width } => self.on_drag_changed(pointer_x, track_width),
            TimerInput::DragEnd => self.on_drag_ended(),
        };
        Ok(t)
    }

    fn apply(&mut self, event: TimerEvent) -> Transition {
        let t = transition(self.state, event);
        self.state = t.state;
        t
    }

    fn apply_nothing(&self) -> Transition {
        Transition {
            state: self.state,
            effects: Vec::new(),
            expired: false,
        }
    }
}
