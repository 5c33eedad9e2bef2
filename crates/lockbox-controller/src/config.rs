//! Controller configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//! Durations are written in milliseconds:
//!
//! ```toml
//! [light]
//! threshold = 0.61
//! direction = "above"
//!
//! [attempts]
//! limit = 3
//! window_ms = 60000
//!
//! [timing]
//! alarm_ms = 30000
//! inactivity_ms = 10000
//! blink_ms = 100
//! alarm_flash_ms = 250
//! tick_ms = 100
//! telemetry_ms = 1000
//! ```

use std::time::Duration;

use lockbox_core::constants::{
    DEFAULT_ALARM_DURATION_MS, DEFAULT_ALARM_FLASH_MS, DEFAULT_ATTEMPT_LIMIT,
    DEFAULT_ATTEMPT_WINDOW_MS, DEFAULT_BLINK_MS, DEFAULT_INACTIVITY_TIMEOUT_MS,
    DEFAULT_LIGHT_THRESHOLD, DEFAULT_TELEMETRY_INTERVAL_MS, DEFAULT_TICK_MS, MAX_FEEDBACK_MS,
};
use lockbox_core::{Error, Result, ThresholdDirection};
use serde::{Deserialize, Serialize};

/// Top-level controller configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockboxConfig {
    #[serde(default)]
    pub light: LightConfig,

    #[serde(default)]
    pub attempts: AttemptConfig,

    #[serde(default)]
    pub timing: TimingConfig,
}

impl LockboxConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for malformed TOML and
    /// `Error::InvalidConfigValue` for out-of-range values.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfigValue` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.light.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(invalid("light.threshold", "must be within 0.0-1.0"));
        }

        if self.attempts.limit == 0 {
            return Err(invalid("attempts.limit", "must be at least 1"));
        }
        if self.attempts.window_ms == 0 {
            return Err(invalid("attempts.window_ms", "must be positive"));
        }

        let timing = &self.timing;
        for (key, value) in [
            ("timing.alarm_ms", timing.alarm_ms),
            ("timing.inactivity_ms", timing.inactivity_ms),
            ("timing.tick_ms", timing.tick_ms),
            ("timing.telemetry_ms", timing.telemetry_ms),
        ] {
            if value == 0 {
                return Err(invalid(key, "must be positive"));
            }
        }

        // Feedback delays stall the control loop
        for (key, value) in [
            ("timing.blink_ms", timing.blink_ms),
            ("timing.alarm_flash_ms", timing.alarm_flash_ms),
        ] {
            if value > MAX_FEEDBACK_MS {
                return Err(invalid(key, &format!("must not exceed {MAX_FEEDBACK_MS} ms")));
            }
        }

        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> Error {
    Error::InvalidConfigValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Daylight gate settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// Normalized threshold in `0.0..=1.0`.
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Which side of the threshold counts as daylight.
    #[serde(default)]
    pub direction: ThresholdDirection,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            direction: ThresholdDirection::default(),
        }
    }
}

fn default_threshold() -> f32 {
    DEFAULT_LIGHT_THRESHOLD
}

/// Failed-attempt policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptConfig {
    /// Mismatches within the window that arm the alarm.
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

impl AttemptConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for AttemptConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            window_ms: default_window_ms(),
        }
    }
}

fn default_limit() -> u32 {
    DEFAULT_ATTEMPT_LIMIT
}

fn default_window_ms() -> u64 {
    DEFAULT_ATTEMPT_WINDOW_MS
}

/// Timeouts, feedback delays and loop periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_alarm_ms")]
    pub alarm_ms: u64,

    #[serde(default = "default_inactivity_ms")]
    pub inactivity_ms: u64,

    #[serde(default = "default_blink_ms")]
    pub blink_ms: u64,

    #[serde(default = "default_alarm_flash_ms")]
    pub alarm_flash_ms: u64,

    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_telemetry_ms")]
    pub telemetry_ms: u64,
}

impl TimingConfig {
    /// How long the alarm sounds before re-locking on its own.
    pub fn alarm_duration(&self) -> Duration {
        Duration::from_millis(self.alarm_ms)
    }

    /// Idle time after which a partial entry is discarded.
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_millis(self.inactivity_ms)
    }

    pub fn blink(&self) -> Duration {
        Duration::from_millis(self.blink_ms)
    }

    /// Duration of each half of the red/blue alarm pattern.
    pub fn alarm_flash(&self) -> Duration {
        Duration::from_millis(self.alarm_flash_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn telemetry_interval(&self) -> Duration {
        Duration::from_millis(self.telemetry_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            alarm_ms: default_alarm_ms(),
            inactivity_ms: default_inactivity_ms(),
            blink_ms: default_blink_ms(),
            alarm_flash_ms: default_alarm_flash_ms(),
            tick_ms: default_tick_ms(),
            telemetry_ms: default_telemetry_ms(),
        }
    }
}

fn default_alarm_ms() -> u64 {
    DEFAULT_ALARM_DURATION_MS
}

fn default_inactivity_ms() -> u64 {
    DEFAULT_INACTIVITY_TIMEOUT_MS
}

fn default_blink_ms() -> u64 {
    DEFAULT_BLINK_MS
}

fn default_alarm_flash_ms() -> u64 {
    DEFAULT_ALARM_FLASH_MS
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

fn default_telemetry_ms() -> u64 {
    DEFAULT_TELEMETRY_INTERVAL_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config_is_valid() {
        let config = LockboxConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.attempts.limit, 3);
        assert_eq!(config.attempts.window(), Duration::from_secs(60));
        assert_eq!(config.timing.alarm_duration(), Duration::from_secs(30));
        assert_eq!(config.light.direction, ThresholdDirection::Above);
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = LockboxConfig::parse("").unwrap();
        assert_eq!(config, LockboxConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let toml = r#"
[light]
direction = "below"

[timing]
alarm_ms = 5000
"#;
        let config = LockboxConfig::parse(toml).unwrap();

        assert_eq!(config.light.direction, ThresholdDirection::Below);
        assert_eq!(config.light.threshold, DEFAULT_LIGHT_THRESHOLD);
        assert_eq!(config.timing.alarm_duration(), Duration::from_secs(5));
        assert_eq!(config.timing.tick_ms, DEFAULT_TICK_MS);
    }

    #[test]
    fn test_malformed_document() {
        let err = LockboxConfig::parse("[light\nthreshold = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[rstest]
    #[case("[light]\nthreshold = 1.5", "light.threshold")]
    #[case("[light]\nthreshold = -0.1", "light.threshold")]
    #[case("[attempts]\nlimit = 0", "attempts.limit")]
    #[case("[attempts]\nwindow_ms = 0", "attempts.window_ms")]
    #[case("[timing]\nalarm_ms = 0", "timing.alarm_ms")]
    #[case("[timing]\ntick_ms = 0", "timing.tick_ms")]
    #[case("[timing]\nblink_ms = 5000", "timing.blink_ms")]
    #[case("[timing]\nalarm_flash_ms = 2001", "timing.alarm_flash_ms")]
    fn test_out_of_range_values(#[case] toml: &str, #[case] expected_key: &str) {
        match LockboxConfig::parse(toml).unwrap_err() {
            Error::InvalidConfigValue { key, .. } => assert_eq!(key, expected_key),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_feedback_delays_allowed() {
        let config = LockboxConfig::parse("[timing]\nblink_ms = 0\nalarm_flash_ms = 0").unwrap();
        assert_eq!(config.timing.blink(), Duration::ZERO);
    }
}
