//! Duration presets and the selector that turns them into events

use serde::Serialize;

use super::{DisplayState, PositiveDuration, TimerEvent};

/// A fixed, named duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetDuration {
    seconds: PositiveDuration,
    label: String,
}

impl PresetDuration {
    pub fn new(seconds: PositiveDuration, label: impl Into<String>) -> Self {
        Self {
            seconds,
            label: label.into(),
        }
    }

    /// Preset of whole minutes, labelled like `"25m"`
    pub fn from_minutes(minutes: u64) -> Option<Self> {
        let seconds = PositiveDuration::from_secs(minutes.checked_mul(60)?)?;
        Some(Self::new(seconds, format!("{}m", minutes)))
    }

    pub fn seconds(&self) -> PositiveDuration {
        self.seconds
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether this preset shows as the active one.
    ///
    /// Exact match only: a time reached by dragging almost never lands on a
    /// preset value.
    pub fn is_selected(&self, display: &DisplayState) -> bool {
        display.remaining_time == self.seconds.get() && !display.is_running
    }
}

/// Preset view for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct PresetView {
    pub index: usize,
    pub label: String,
    pub seconds: f64,
    pub selected: bool,
}

/// Ordered preset set, fixed at configuration time
#[derive(Debug, Clone)]
pub struct PresetSelector {
    presets: Vec<PresetDuration>,
}

impl PresetSelector {
    pub fn new(presets: Vec<PresetDuration>) -> Self {
        Self { presets }
    }

    /// Build from a list of minute values, skipping zeros
    pub fn from_minutes(minutes: &[u64]) -> Self {
        Self::new(
            minutes
                .iter()
                .filter_map(|&m| PresetDuration::from_minutes(m))
                .collect(),
        )
    }

    pub fn presets(&self) -> &[PresetDuration] {
        &self.presets
    }

    pub fn get(&self, index: usize) -> Option<&PresetDuration> {
        self.presets.get(index)
    }

    /// Event selecting the preset at `index`, if there is one
    pub fn select(&self, index: usize) -> Option<TimerEvent> {
        self.get(index)
            .map(|preset| TimerEvent::SetDuration(preset.seconds().get()))
    }

    pub fn views(&self, display: &DisplayState) -> Vec<PresetView> {
        self.presets
            .iter()
            .enumerate()
            .map(|(index, preset)| PresetView {
                index,
                label: preset.label().to_string(),
                seconds: preset.seconds().as_secs_f64(),
                selected: preset.is_selected(display),
            })
            .collect()
    }
}

impl Default for PresetSelector {
    fn default() -> Self {
        Self::from_minutes(&[5, 10, 25])
    }
}
