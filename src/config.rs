//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use anyhow::{bail, Context};
use clap::Parser;

use crate::state::{PositiveDuration, PresetSelector};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "clepsydra")]
#[command(about = "A countdown timer with a drag-to-scrub control, driven over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Full scrubber range in seconds
    #[arg(long, default_value = "5400")]
    pub total_seconds: u64,

    /// Remaining time at startup in seconds (defaults to the full range)
    #[arg(long)]
    pub initial_seconds: Option<u64>,

    /// Preset durations in minutes
    #[arg(long, value_delimiter = ',', default_values_t = [5u64, 10, 25])]
    pub presets: Vec<u64>,

    /// Clock pulse interval in milliseconds; each pulse takes this much off the clock
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Alarm sound file; the terminal bell is used when omitted
    #[arg(short, long)]
    pub sound: Option<PathBuf>,

    /// Program used to play the alarm sound
    #[arg(long, default_value = "paplay")]
    pub player: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Reject settings the timer cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.total_seconds == 0 {
            bail!("--total-seconds must be greater than zero");
        }
        if self.tick_ms == 0 {
            bail!("--tick-ms must be greater than zero");
        }
        if self.presets.iter().any(|&minutes| minutes == 0) {
            bail!("--presets must all be greater than zero");
        }
        if let Some(sound) = &self.sound {
            if !sound.exists() {
                tracing::warn!("Alarm sound {} does not exist yet", sound.display());
            }
        }
        Ok(())
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn total_duration(&self) -> anyhow::Result<PositiveDuration> {
        PositiveDuration::from_secs(self.total_seconds)
            .context("total duration must be greater than zero")
    }

    pub fn initial_remaining(&self) -> Option<Duration> {
        self.initial_seconds.map(Duration::from_secs)
    }

    pub fn unit_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn preset_selector(&self) -> PresetSelector {
        PresetSelector::from_minutes(&self.presets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("clepsydra").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_the_widget() {
        let config = parse(&[]);
        assert_eq!(config.total_seconds, 5400);
        assert_eq!(config.presets, vec![5, 10, 25]);
        assert_eq!(config.unit_interval(), Duration::from_secs(1));
        assert_eq!(config.initial_remaining(), None);
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn presets_are_comma_separated() {
        let config = parse(&["--presets", "1,2,3,45", "-v"]);
        assert_eq!(config.preset_selector().presets().len(), 4);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn rejects_zero_values() {
        assert!(parse(&["--total-seconds", "0"]).validate().is_err());
        assert!(parse(&["--tick-ms", "0"]).validate().is_err());
        assert!(parse(&["--presets", "5,0"]).validate().is_err());
    }
}
