//! Utility functions module
//!
//! Process-level helpers that sit outside the timer core.

pub mod signals;

// Re-export main functions
pub use signals::shutdown_signal;
