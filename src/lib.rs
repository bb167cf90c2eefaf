//! Clepsydra - A countdown timer with a drag-to-scrub control
//!
//! The timer core is a small state machine fed from a single event queue:
//! clock pulses, preset selections and scrubber drags all pass through it.
//! An HTTP surface acts as the presentation layer.

pub mod config;
pub mod state;
pub mod scrubber;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerCore};
pub use api::create_router;
pub use tasks::spawn_timer_loop;
pub use utils::signals::shutdown_signal;
