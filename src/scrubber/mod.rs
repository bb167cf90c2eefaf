//! Drag-to-scrub control
//!
//! Geometry mapping between pointer coordinates and timer fractions, plus
//! the short-lived session that exists while the pointer is held down.

pub mod drag;
pub mod geometry;

pub use drag::DragSession;
pub use geometry::{fraction_to_position, position_to_fraction, ScrubberGeometry};
