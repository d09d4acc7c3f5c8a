//! Configuration for emote arbitration

use crate::error::EmoteError;
use crate::preset::{ExpressionPreset, GestureType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Emote controller configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmoteConfig {
    /// Involuntary blink timing
    pub blink: BlinkConfig,

    /// Emotion playback durations
    pub emotion: EmotionConfig,

    /// Gesture playback durations
    pub gesture: GestureConfig,

    /// Lip-sync overlay behavior
    pub lip_sync: LipSyncConfig,
}

/// Blink timer configuration. All values in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlinkConfig {
    /// Enable automatic blinking
    pub enabled: bool,

    /// Shortest blink-eligible time between blinks (default 2.0)
    pub interval_min: f32,

    /// Longest blink-eligible time between blinks (default 6.0)
    pub interval_max: f32,

    /// Time for the lids to close (default 0.06)
    pub close_duration: f32,

    /// Time the lids stay shut (default 0.04)
    pub hold_duration: f32,

    /// Time for the lids to reopen (default 0.08)
    pub open_duration: f32,

    /// Seed for the interval RNG. Unset draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_min: 2.0,
            interval_max: 6.0,
            close_duration: 0.06,
            hold_duration: 0.04,
            open_duration: 0.08,
            seed: None,
        }
    }
}

impl BlinkConfig {
    /// Fixed-interval config, mostly useful for deterministic playback
    pub fn every(interval: f32) -> Self {
        Self {
            interval_min: interval,
            interval_max: interval,
            ..Self::default()
        }
    }
}

/// Emotion playback configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmotionConfig {
    /// Duration used when a preset has no override (default 3.0s)
    pub default_duration: f32,

    /// Per-preset duration overrides
    pub durations: BTreeMap<ExpressionPreset, f32>,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            default_duration: 3.0,
            durations: BTreeMap::new(),
        }
    }
}

impl EmotionConfig {
    pub fn duration_for(&self, preset: ExpressionPreset) -> f32 {
        self.durations
            .get(&preset)
            .copied()
            .unwrap_or(self.default_duration)
    }
}

/// Gesture playback configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    /// Duration used when a gesture has no override (default 2.0s)
    pub default_duration: f32,

    /// Per-gesture duration overrides. Ignored for looping gestures.
    pub durations: BTreeMap<GestureType, f32>,

    /// Clip length that looping gestures wrap at (default 4.0s)
    pub idle_loop_length: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        let mut durations = BTreeMap::new();
        durations.insert(GestureType::Nod, 1.2);
        durations.insert(GestureType::Wave, 2.4);
        durations.insert(GestureType::CloseEyes, 2.5);
        durations.insert(GestureType::ShakeHead, 1.5);
        durations.insert(GestureType::Bow, 2.0);
        Self {
            default_duration: 2.0,
            durations,
            idle_loop_length: 4.0,
        }
    }
}

impl GestureConfig {
    /// Playback length for `gesture`; infinite for looping gestures
    pub fn duration_for(&self, gesture: GestureType) -> f32 {
        if gesture.is_looping() {
            return f32::INFINITY;
        }
        self.durations
            .get(&gesture)
            .copied()
            .unwrap_or(self.default_duration)
    }
}

/// Lip-sync overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LipSyncConfig {
    /// Enable lip sync
    pub enabled: bool,

    /// Linear weight decay per second after a value has been shown
    /// (0.0 holds the last value until the next call)
    pub decay_per_second: f32,
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            decay_per_second: 0.0,
        }
    }
}

impl EmoteConfig {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, EmoteError> {
        let config: EmoteConfig = toml::from_str(s)?;
        config.validate().map_err(EmoteError::Config)?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EmoteError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let blink = &self.blink;
        check_positive("blink.interval_min", blink.interval_min)?;
        check_positive("blink.interval_max", blink.interval_max)?;
        if blink.interval_min > blink.interval_max {
            return Err(format!(
                "blink.interval_min ({}) must not exceed blink.interval_max ({})",
                blink.interval_min, blink.interval_max
            ));
        }
        check_non_negative("blink.close_duration", blink.close_duration)?;
        check_non_negative("blink.hold_duration", blink.hold_duration)?;
        check_non_negative("blink.open_duration", blink.open_duration)?;

        check_positive("emotion.default_duration", self.emotion.default_duration)?;
        for (preset, duration) in &self.emotion.durations {
            if !preset.is_emotion() {
                return Err(format!("emotion.durations: '{}' is not an emotion preset", preset));
            }
            check_positive(&format!("emotion.durations.{}", preset), *duration)?;
        }

        check_positive("gesture.default_duration", self.gesture.default_duration)?;
        check_positive("gesture.idle_loop_length", self.gesture.idle_loop_length)?;
        for (gesture, duration) in &self.gesture.durations {
            check_positive(&format!("gesture.durations.{}", gesture), *duration)?;
        }

        check_non_negative("lip_sync.decay_per_second", self.lip_sync.decay_per_second)?;

        Ok(())
    }
}

fn check_positive(name: &str, value: f32) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{} must be a positive number of seconds, got {}", name, value));
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f32) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{} must be zero or positive, got {}", name, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EmoteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_duration_lookup_falls_back_to_default() {
        let mut config = EmotionConfig::default();
        config.durations.insert(ExpressionPreset::Happy, 2.0);
        assert_eq!(config.duration_for(ExpressionPreset::Happy), 2.0);
        assert_eq!(config.duration_for(ExpressionPreset::Sad), 3.0);
    }

    #[test]
    fn test_looping_gesture_duration_is_infinite() {
        let config = GestureConfig::default();
        assert!(config.duration_for(GestureType::Idle).is_infinite());
        assert_eq!(config.duration_for(GestureType::CloseEyes), 2.5);
    }

    #[test]
    fn test_rejects_inverted_blink_interval() {
        let mut config = EmoteConfig::default();
        config.blink.interval_min = 5.0;
        config.blink.interval_max = 4.0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("interval_min"));
    }

    #[test]
    fn test_rejects_non_emotion_duration_key() {
        let mut config = EmoteConfig::default();
        config.emotion.durations.insert(ExpressionPreset::Blink, 1.0);
        assert!(config.validate().is_err());
    }
}
