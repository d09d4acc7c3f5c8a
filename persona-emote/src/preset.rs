//! Expression presets and gesture types
//!
//! Both are closed enumerations. Upstream tag extraction is expected to map
//! free-form text onto these before calling into the controllers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Facial expression preset
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionPreset {
    /// Neutral/resting face
    Neutral,
    /// Happy/smiling
    Happy,
    /// Angry
    Angry,
    /// Sad/frowning
    Sad,
    /// Surprised, eyes widened
    Surprised,
    /// Relaxed, eyes softened
    Relaxed,
    /// Reserved for the involuntary blink
    Blink,
    /// Viseme "aa"
    Aa,
    /// Viseme "ih"
    Ih,
    /// Viseme "ou"
    Ou,
    /// Viseme "ee"
    Ee,
    /// Viseme "oh"
    Oh,
}

impl ExpressionPreset {
    pub const EMOTIONS: [ExpressionPreset; 5] = [
        ExpressionPreset::Happy,
        ExpressionPreset::Angry,
        ExpressionPreset::Sad,
        ExpressionPreset::Surprised,
        ExpressionPreset::Relaxed,
    ];

    pub const VISEMES: [ExpressionPreset; 5] = [
        ExpressionPreset::Aa,
        ExpressionPreset::Ih,
        ExpressionPreset::Ou,
        ExpressionPreset::Ee,
        ExpressionPreset::Oh,
    ];

    /// True for presets that can be played as a one-shot emotion
    pub fn is_emotion(&self) -> bool {
        Self::EMOTIONS.contains(self)
    }

    /// True for mouth shapes used by lip sync
    pub fn is_viseme(&self) -> bool {
        Self::VISEMES.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Angry => "angry",
            Self::Sad => "sad",
            Self::Surprised => "surprised",
            Self::Relaxed => "relaxed",
            Self::Blink => "blink",
            Self::Aa => "aa",
            Self::Ih => "ih",
            Self::Ou => "ou",
            Self::Ee => "ee",
            Self::Oh => "oh",
        }
    }
}

impl fmt::Display for ExpressionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body/eye gesture types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GestureType {
    /// Looping rest motion
    Idle,
    /// Nod head
    Nod,
    /// Wave hand
    Wave,
    /// Close eyes for a beat
    CloseEyes,
    /// Shake head
    ShakeHead,
    /// Bow
    Bow,
}

impl GestureType {
    /// Whether the gesture pose shuts the eyelids. Static per type.
    pub fn closes_eyes(&self) -> bool {
        matches!(self, GestureType::CloseEyes)
    }

    /// Looping gestures never expire on their own
    pub fn is_looping(&self) -> bool {
        matches!(self, GestureType::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Nod => "nod",
            Self::Wave => "wave",
            Self::CloseEyes => "close_eyes",
            Self::ShakeHead => "shake_head",
            Self::Bow => "bow",
        }
    }
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
