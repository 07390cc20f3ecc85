//! Trade pacing and sampler cadence

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Trade interval at speed 1 (ms)
    pub base_interval_ms: u64,
    pub initial_speed: u32,
    /// At this speed trades run back to back
    pub max_speed: u32,
    /// Snapshot cadence, independent of speed (ms)
    pub sampler_interval_ms: u64,
    pub start_paused: bool,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 1_000,
            initial_speed: 1,
            max_speed: 100,
            sampler_interval_ms: 1_000,
            start_paused: false,
        }
    }
}

impl PacingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_speed == 0 {
            return Err(ConfigError::Invalid("max_speed must be at least 1".to_string()));
        }
        if self.sampler_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "sampler_interval_ms must be positive".to_string(),
            ));
        }
        if self.base_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "base_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Clamp a requested speed into [1, max_speed]
    pub fn clamp_speed(&self, speed: u32) -> u32 {
        speed.clamp(1, self.max_speed.max(1))
    }

    /// Delay between trades at `speed`; `None` means continuous
    pub fn interval_for(&self, speed: u32) -> Option<Duration> {
        let speed = self.clamp_speed(speed);
        if speed >= self.max_speed {
            return None;
        }
        Some(Duration::from_millis(self.base_interval_ms) / speed)
    }

    pub fn sampler_interval(&self) -> Duration {
        Duration::from_millis(self.sampler_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_shrinks_with_speed() {
        let pacing = PacingConfig::default();
        assert_eq!(pacing.interval_for(1), Some(Duration::from_millis(1_000)));
        assert_eq!(pacing.interval_for(4), Some(Duration::from_millis(250)));
        assert_eq!(pacing.interval_for(99), Some(Duration::from_millis(1_000) / 99));
    }

    #[test]
    fn test_max_speed_is_continuous() {
        let pacing = PacingConfig::default();
        assert_eq!(pacing.interval_for(100), None);
        assert_eq!(pacing.interval_for(5_000), None);
    }

    #[test]
    fn test_speed_clamped() {
        let pacing = PacingConfig {
            max_speed: 10,
            ..Default::default()
        };
        assert_eq!(pacing.clamp_speed(0), 1);
        assert_eq!(pacing.clamp_speed(7), 7);
        assert_eq!(pacing.clamp_speed(50), 10);
        assert_eq!(pacing.interval_for(0), Some(Duration::from_millis(1_000)));
    }

    #[test]
    fn test_speed_one_of_one_is_continuous() {
        let pacing = PacingConfig {
            max_speed: 1,
            ..Default::default()
        };
        assert_eq!(pacing.interval_for(1), None);
    }
}
