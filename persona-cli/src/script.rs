//! Cue scripts: timed emotion, gesture and lip-sync commands in TOML
//!
//! ```toml
//! [[cue]]
//! at = 0.5
//! emotion = "happy"
//! duration = 2.0
//!
//! [[cue]]
//! at = 1.0
//! gesture = "close_eyes"
//!
//! [[cue]]
//! at = 1.2
//! lip_sync = { preset = "aa", value = 0.7 }
//! ```

use anyhow::{bail, Context, Result};
use persona_emote::{EmoteController, ExpressionPreset, GestureType};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default, rename = "cue")]
    pub cues: Vec<Cue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cue {
    /// Seconds from the start of the run
    pub at: f32,
    pub emotion: Option<ExpressionPreset>,
    pub gesture: Option<GestureType>,
    pub lip_sync: Option<LipSyncCue>,
    /// Overrides the configured emotion/gesture duration
    pub duration: Option<f32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LipSyncCue {
    pub preset: ExpressionPreset,
    pub value: f32,
}

impl Cue {
    fn validate(&self, index: usize) -> Result<()> {
        if !self.at.is_finite() || self.at < 0.0 {
            bail!("cue {}: 'at' must be a non-negative number of seconds", index);
        }
        let actions = [
            self.emotion.is_some(),
            self.gesture.is_some(),
            self.lip_sync.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if actions != 1 {
            bail!(
                "cue {}: expected exactly one of 'emotion', 'gesture' or 'lip_sync', found {}",
                index,
                actions
            );
        }
        if self.duration.is_some() && self.lip_sync.is_some() {
            bail!("cue {}: 'duration' does not apply to lip_sync", index);
        }
        Ok(())
    }

    /// Send this cue to the controller
    pub fn fire(&self, emote: &mut EmoteController) {
        debug!("Firing cue at {:.3}s", self.at);
        if let Some(preset) = self.emotion {
            match self.duration {
                Some(duration) => emote.play_emotion_for(preset, duration),
                None => emote.play_emotion(preset),
            }
        } else if let Some(gesture) = self.gesture {
            match self.duration {
                Some(duration) => emote.play_gesture_for(gesture, duration),
                None => emote.play_gesture(gesture),
            }
        } else if let Some(lip) = self.lip_sync {
            emote.lip_sync(lip.preset, lip.value);
        }
    }
}

impl Script {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut script: Script = toml::from_str(s).context("Failed to parse cue script")?;
        for (index, cue) in script.cues.iter().enumerate() {
            cue.validate(index)?;
        }
        // Stable sort keeps file order for cues sharing a timestamp
        script.cues.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(script)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cue script {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Time of the last cue, or zero for an empty script
    pub fn end_time(&self) -> f32 {
        self.cues.last().map_or(0.0, |c| c.at)
    }
}
