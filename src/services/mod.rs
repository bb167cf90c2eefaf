//! External collaborators
//!
//! Capabilities the timer core reaches through narrow interfaces.

pub mod alarm;

pub use alarm::*;
