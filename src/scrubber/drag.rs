//! Pointer-down drag session

use super::ScrubberGeometry;

/// Lives from pointer-down to pointer-up on the scrubber
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    last_fraction: f64,
}

impl DragSession {
    /// Open a session at the first pointer sample
    pub fn begin(pointer_x: f64, geometry: ScrubberGeometry) -> Self {
        Self {
            last_fraction: geometry.fraction_at(pointer_x),
        }
    }

    /// Record a pointer-move sample and return its fraction
    pub fn update(&mut self, pointer_x: f64, geometry: ScrubberGeometry) -> f64 {
        self.last_fraction = geometry.fraction_at(pointer_x);
        self.last_fraction
    }

    pub fn last_fraction(&self) -> f64 {
        self.last_fraction
    }

    /// Close the session, returning where it ended
    pub fn end(self) -> f64 {
        self.last_fraction
    }
}
