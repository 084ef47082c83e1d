use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::time::{DEFAULT_HEARTBEAT_MS, DEFAULT_SCROLL_THROTTLE_MS};

pub const DEFAULT_THRESHOLDS: [u8; 5] = [25, 50, 75, 90, 100];

pub const ENV_THRESHOLDS: &str = "BEACON_SCROLL_THRESHOLDS";
pub const ENV_HEARTBEAT_MS: &str = "BEACON_HEARTBEAT_MS";
pub const ENV_SCROLL_THROTTLE_MS: &str = "BEACON_SCROLL_THROTTLE_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one scroll threshold is required")]
    NoThresholds,
    #[error("scroll threshold {0} is outside 1..=100")]
    ThresholdOutOfRange(u16),
    #[error("scroll thresholds must be strictly ascending ({prev} then {next})")]
    ThresholdsNotAscending { prev: u8, next: u8 },
    #[error("heartbeat interval must be non-zero")]
    ZeroHeartbeat,
    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },
    #[error("invalid config document: {0}")]
    Parse(String),
}

/// Tracker settings shared by every page mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Depth percentages reported once per session, ascending.
    pub scroll_thresholds: Vec<u8>,
    pub heartbeat_interval_ms: u64,
    /// Minimum spacing between two scroll evaluations. Zero disables throttling.
    pub scroll_throttle_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            scroll_thresholds: DEFAULT_THRESHOLDS.to_vec(),
            heartbeat_interval_ms: DEFAULT_HEARTBEAT_MS,
            scroll_throttle_ms: DEFAULT_SCROLL_THROTTLE_MS,
        }
    }
}

impl TrackerConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scroll_thresholds.is_empty() {
            return Err(ConfigError::NoThresholds);
        }
        for &t in &self.scroll_thresholds {
            if t == 0 || t > 100 {
                return Err(ConfigError::ThresholdOutOfRange(u16::from(t)));
            }
        }
        for pair in self.scroll_thresholds.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ConfigError::ThresholdsNotAscending {
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }
        if self.heartbeat_interval_ms == 0 {
            return Err(ConfigError::ZeroHeartbeat);
        }
        Ok(())
    }

    /// Parses and validates a JSON document. Missing fields take defaults.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(doc).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `BEACON_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_THRESHOLDS) {
            config.scroll_thresholds = parse_thresholds(&raw)?;
        }
        if let Some(raw) = lookup(ENV_HEARTBEAT_MS) {
            config.heartbeat_interval_ms = parse_millis(ENV_HEARTBEAT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SCROLL_THROTTLE_MS) {
            config.scroll_throttle_ms = parse_millis(ENV_SCROLL_THROTTLE_MS, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_thresholds(raw: &str) -> Result<Vec<u8>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let n: u16 = s.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_THRESHOLDS,
                reason: format!("'{}' is not a whole number", s),
            })?;
            u8::try_from(n).map_err(|_| ConfigError::ThresholdOutOfRange(n))
        })
        .collect()
}

fn parse_millis(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        reason: format!("'{}' is not a millisecond count", raw.trim()),
    })
}
