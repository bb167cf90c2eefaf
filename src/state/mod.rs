//! State management module
//!
//! Timer state, the state machine that mutates it, presets, and the shared
//! application handle used by the HTTP layer.

pub mod app_state;
pub mod controller;
pub mod machine;
pub mod preset;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, DispatchError};
pub use controller::{InputError, TimerCore, TimerInput};
pub use machine::{transition, TimerEffect, TimerEvent, TimerPhase, Transition};
pub use preset::{PresetDuration, PresetSelector, PresetView};
pub use timer_state::{DisplayState, PositiveDuration, TimerState};
