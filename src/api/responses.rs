//! API request and response structures

use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    scrubber::fraction_to_position,
    state::{DisplayState, PresetView},
};

/// Format remaining time as `H:MM:SS` from an hour upwards, else `MM:SS`
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Timer snapshot as rendered for clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub remaining_seconds: f64,
    pub total_seconds: f64,
    pub is_running: bool,
    pub display: String,
    pub fraction: f64,
    /// Scrubber offset, present when the client sent its track width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrubber_x: Option<f64>,
}

impl TimerView {
    pub fn new(display: &DisplayState, track_width: Option<f64>) -> Self {
        Self {
            remaining_seconds: display.remaining_time.as_secs_f64(),
            total_seconds: display.total_duration.as_secs_f64(),
            is_running: display.is_running,
            display: format_remaining(display.remaining_time),
            fraction: display.fraction(),
            scrubber_x: track_width.map(|width| {
                fraction_to_position(display.remaining_time, display.total_duration, width)
            }),
        }
    }
}

/// Response for endpoints that change the timer
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    pub fn new(message: String, display: &DisplayState) -> Self {
        Self {
            status: if display.is_running { "running" } else { "idle" }.to_string(),
            message,
            timestamp: Utc::now(),
            timer: TimerView::new(display, None),
        }
    }
}

/// Status response with presets and server metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub presets: Vec<PresetView>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Error body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body for `/drag/begin` and `/drag/move`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DragRequest {
    pub pointer_x: f64,
    pub track_width: f64,
}

/// Body for `/duration`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DurationRequest {
    pub seconds: f64,
}

/// Query for `/status`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatusQuery {
    pub track_width: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_remaining(Duration::from_secs(300)), "05:00");
        assert_eq!(format_remaining(Duration::from_secs(59)), "00:59");
        assert_eq!(format_remaining(Duration::ZERO), "00:00");
        assert_eq!(format_remaining(Duration::from_millis(61_900)), "01:01");
    }

    #[test]
    fn formats_hours() {
        assert_eq!(format_remaining(Duration::from_secs(3600)), "1:00:00");
        assert_eq!(format_remaining(Duration::from_secs(5400)), "1:30:00");
        assert_eq!(format_remaining(Duration::from_secs(5399)), "1:29:59");
    }

    #[test]
    fn view_includes_scrubber_offset_on_request() {
        let display = DisplayState {
            remaining_time: Duration::from_secs(1350),
            total_duration: Duration::from_secs(5400),
            is_running: true,
        };
        let view = TimerView::new(&display, Some(300.0));
        assert_eq!(view.display, "22:30");
        assert!((view.fraction - 0.25).abs() < 1e-12);
        assert!((view.scrubber_x.unwrap() - 75.0).abs() < 1e-9);
        assert!(TimerView::new(&display, None).scrubber_x.is_none());
    }
}
