//! Main application state shared with the HTTP handlers

use std::{sync::Mutex, time::Instant};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{info, warn};

use super::{DisplayState, InputError, PresetSelector, PresetView, TimerInput};
use crate::tasks::{QueueMessage, TimerHandle};

/// Why an input could not be applied
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Rejected(#[from] InputError),

    #[error("Timer loop unavailable: {0}")]
    Unavailable(String),
}

/// Handle to the timer loop plus server metadata
///
/// The timer state itself lives in the event loop; this only holds the
/// queue into it and the latest published snapshot.
#[derive(Debug)]
pub struct AppState {
    queue: mpsc::Sender<QueueMessage>,
    snapshots: watch::Receiver<DisplayState>,
    presets: PresetSelector,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(port: u16, host: String, presets: PresetSelector, timer: &TimerHandle) -> Self {
        Self {
            queue: timer.queue.clone(),
            snapshots: timer.snapshots.clone(),
            presets,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Queue a user input and wait for the resulting snapshot
    pub async fn dispatch(&self, input: TimerInput) -> Result<DisplayState, DispatchError> {
        let (reply, response) = oneshot::channel();
        self.queue
            .send(QueueMessage::Input { input, reply })
            .await
            .map_err(|e| DispatchError::Unavailable(format!("Failed to queue input: {}", e)))?;

        let display = response
            .await
            .map_err(|e| DispatchError::Unavailable(format!("No reply from timer loop: {}", e)))??;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(input.name().to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
        Ok(display)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> DisplayState {
        *self.snapshots.borrow()
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.snapshots.clone()
    }

    pub fn presets(&self) -> &PresetSelector {
        &self.presets
    }

    pub fn preset_views(&self) -> Vec<PresetView> {
        self.presets.views(&self.snapshot())
    }

    /// Ask the timer loop to stop
    pub async fn request_shutdown(&self) {
        if let Err(e) = self.queue.send(QueueMessage::Shutdown).await {
            warn!("Timer loop already gone: {}", e);
        } else {
            info!("Timer loop shutdown requested");
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
