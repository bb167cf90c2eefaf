//! Background tasks module
//!
//! The timer event loop and the clock driver that feeds it.

pub mod clock_driver;
pub mod timer_loop;

// Re-export main types
pub use clock_driver::ClockDriver;
pub use timer_loop::{spawn_timer_loop, timer_event_loop, QueueMessage, TimerHandle};
