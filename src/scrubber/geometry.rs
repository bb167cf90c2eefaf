//! Pointer coordinate <-> fraction mapping

use std::time::Duration;

/// Map a pointer x coordinate on a track to a fraction in `[0, 1]`.
///
/// Non-positive or non-finite widths map everything to 0.
pub fn position_to_fraction(pointer_x: f64, track_width: f64) -> f64 {
    if !track_width.is_finite() || track_width <= 0.0 || pointer_x.is_nan() {
        return 0.0;
    }
    pointer_x.clamp(0.0, track_width) / track_width
}

/// Map remaining time to its pixel offset along a track
pub fn fraction_to_position(remaining: Duration, total: Duration, track_width: f64) -> f64 {
    if total.is_zero() || !track_width.is_finite() || track_width <= 0.0 {
        return 0.0;
    }
    remaining.as_secs_f64() / total.as_secs_f64() * track_width
}

/// Track dimensions for the current layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubberGeometry {
    pub track_width_px: f64,
}

impl ScrubberGeometry {
    pub fn new(track_width_px: f64) -> Self {
        Self { track_width_px }
    }

    pub fn fraction_at(&self, pointer_x: f64) -> f64 {
        position_to_fraction(pointer_x, self.track_width_px)
    }

    pub fn position_of(&self, remaining: Duration, total: Duration) -> f64 {
        fraction_to_position(remaining, total, self.track_width_px)
    }
}
