//! Alarm playback capability

use std::{
    io::Write,
    path::PathBuf,
    sync::Arc,
};
use futures::future::{BoxFuture, FutureExt};
use thiserror::Error;
use tokio::{process::Command, task::JoinHandle};
use tracing::{debug, info, warn};

/// Errors raised while trying to sound the alarm
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Alarm sound file does not exist
    #[error("Alarm sound not found: {0}")]
    AssetMissing(PathBuf),

    /// Audio output could not be reached
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Player ran but reported failure
    #[error("Alarm player failed: {0}")]
    PlayerFailed(String),
}

/// Something that can play the expiry alarm
pub trait AlarmPlayer: Send + Sync + 'static {
    fn play_alarm_sound(&self) -> BoxFuture<'static, Result<(), PlaybackError>>;
}

/// Plays an audio file through an external player program
#[derive(Debug, Clone)]
pub struct CommandAlarmPlayer {
    program: String,
    asset: PathBuf,
}

impl CommandAlarmPlayer {
    pub fn new(program: impl Into<String>, asset: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            asset: asset.into(),
        }
    }
}

impl AlarmPlayer for CommandAlarmPlayer {
    fn play_alarm_sound(&self) -> BoxFuture<'static, Result<(), PlaybackError>> {
        let program = self.program.clone();
        let asset = self.asset.clone();

        async move {
            if !tokio::fs::try_exists(&asset).await.unwrap_or(false) {
                return Err(PlaybackError::AssetMissing(asset));
            }

            debug!("Playing {} with {}", asset.display(), program);
            let output = Command::new(&program)
                .arg(&asset)
                .output()
                .await
                .map_err(|e| PlaybackError::DeviceUnavailable(format!("{}: {}", program, e)))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(PlaybackError::PlayerFailed(stderr.trim().to_string()));
            }
            Ok(())
        }
        .boxed()
    }
}

/// Rings the terminal bell; used when no sound file is configured
#[derive(Debug, Clone, Default)]
pub struct TerminalBellPlayer;

impl AlarmPlayer for TerminalBellPlayer {
    fn play_alarm_sound(&self) -> BoxFuture<'static, Result<(), PlaybackError>> {
        async move {
            let mut stdout = std::io::stdout();
            stdout
                .write_all(b"\x07")
                .and_then(|_| stdout.flush())
                .map_err(|e| PlaybackError::DeviceUnavailable(e.to_string()))
        }
        .boxed()
    }
}

/// Sound the alarm in the background.
///
/// The outcome is only logged; nothing is reported back to the timer.
pub fn dispatch_alarm(player: Arc<dyn AlarmPlayer>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match player.play_alarm_sound().await {
            Ok(()) => info!("Alarm played"),
            Err(e) => warn!("Failed to play alarm: {}", e),
        }
    })
}

/// Check that the player program can be launched
pub async fn check_player_available(program: &str) -> Result<(), String> {
    Command::new(program)
        .arg("--version")
        .output()
        .await
        .map_err(|_| format!("{} is not available, alarm playback will fail", program))?;

    info!("{} is available", program);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_asset_is_reported() {
        let player = CommandAlarmPlayer::new("true", "/nonexistent/clepsydra/alarm.mp3");
        match player.play_alarm_sound().await {
            Err(PlaybackError::AssetMissing(path)) => {
                assert_eq!(path, PathBuf::from("/nonexistent/clepsydra/alarm.mp3"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_program_is_device_unavailable() {
        let asset = std::env::current_exe().unwrap();
        let player = CommandAlarmPlayer::new("clepsydra-no-such-player", asset);
        assert!(matches!(
            player.play_alarm_sound().await,
            Err(PlaybackError::DeviceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn failed_dispatch_is_swallowed() {
        let player: Arc<dyn AlarmPlayer> =
            Arc::new(CommandAlarmPlayer::new("true", "/nonexistent/clepsydra/alarm.mp3"));
        dispatch_alarm(player).await.unwrap();
    }
}
