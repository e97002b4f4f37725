//! Configuration for the state reconciler

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StateError};

/// Timing of the reconciler's poll and ping loops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Delay before the next liveness ping after a successful one
    /// Default: 10 seconds
    pub ping_interval: Duration,

    /// Delay before the next liveness ping after a failed one
    /// Default: 2 seconds
    pub ping_retry_interval: Duration,

    /// Tick interval of the poll-only loop
    /// Default: 1 second
    pub poll_interval: Duration,

    /// Playlists are re-derived once every this many poll ticks
    /// Default: 5
    pub playlist_poll_ticks: u32,

    /// Delay of the forced re-check after a "playing at 00:00" result on a push transport
    /// Default: 1 second
    pub playing_recheck_delay: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(10),
            ping_retry_interval: Duration::from_secs(2),
            poll_interval: Duration::from_secs(1),
            playlist_poll_ticks: 5,
            playing_recheck_delay: Duration::from_secs(1),
        }
    }
}

impl ReconcilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tighter loops for UIs that must follow the host closely
    pub fn responsive() -> Self {
        Self {
            ping_interval: Duration::from_secs(5),
            ping_retry_interval: Duration::from_secs(1),
            poll_interval: Duration::from_millis(500),
            playlist_poll_ticks: 3,
            ..Default::default()
        }
    }

    /// Slower loops for background observers
    pub fn resource_efficient() -> Self {
        Self {
            ping_interval: Duration::from_secs(30),
            ping_retry_interval: Duration::from_secs(5),
            poll_interval: Duration::from_secs(3),
            playlist_poll_ticks: 10,
            ..Default::default()
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.ping_interval.is_zero() || self.ping_retry_interval.is_zero() {
            return Err(StateError::Config(
                "Ping intervals must be greater than 0".to_string(),
            ));
        }

        if self.ping_retry_interval > self.ping_interval {
            return Err(StateError::Config(
                "Ping retry interval must not exceed the ping interval".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(StateError::Config(
                "Poll interval must be greater than 0".to_string(),
            ));
        }

        if self.playlist_poll_ticks == 0 {
            return Err(StateError::Config(
                "Playlist poll ticks must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_ping_intervals(mut self, success: Duration, retry: Duration) -> Self {
        self.ping_interval = success;
        self.ping_retry_interval = retry;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_playlist_poll_ticks(mut self, ticks: u32) -> Self {
        self.playlist_poll_ticks = ticks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReconcilerConfig::default();
        assert_eq!(config.ping_interval, Duration::from_secs(10));
        assert_eq!(config.ping_retry_interval, Duration::from_secs(2));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.playlist_poll_ticks, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ReconcilerConfig::responsive().validate().is_ok());
        assert!(ReconcilerConfig::resource_efficient().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let zero_poll = ReconcilerConfig::new().with_poll_interval(Duration::ZERO);
        assert!(zero_poll.validate().is_err());

        let inverted = ReconcilerConfig::new()
            .with_ping_intervals(Duration::from_secs(1), Duration::from_secs(5));
        assert!(inverted.validate().is_err());

        let no_ticks = ReconcilerConfig::new().with_playlist_poll_ticks(0);
        assert!(no_ticks.validate().is_err());
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: ReconcilerConfig =
            serde_json::from_str(r#"{"playlist_poll_ticks": 2}"#).unwrap();
        assert_eq!(config.playlist_poll_ticks, 2);
        assert_eq!(config.ping_interval, Duration::from_secs(10));
    }
}
