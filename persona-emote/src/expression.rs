//! Expression controller: one-shot emotions, blink and lip-sync overlay

use crate::blink::BlinkTimer;
use crate::config::{EmoteConfig, EmotionConfig, LipSyncConfig};
use crate::preset::ExpressionPreset;
use crate::rig::{FacePose, LipSyncOverlay};
use tracing::{debug, warn};

/// One emotion playback instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionPlayback {
    pub preset: ExpressionPreset,
    pub elapsed: f32,
    pub total_duration: f32,
    pub is_active: bool,
}

impl EmotionPlayback {
    fn new(preset: ExpressionPreset, total_duration: f32) -> Self {
        Self {
            preset,
            elapsed: 0.0,
            total_duration,
            is_active: true,
        }
    }

    /// Returns true on the tick the playback expires
    fn advance(&mut self, delta: f32) -> bool {
        if !self.is_active {
            return false;
        }
        self.elapsed += delta;
        if self.elapsed >= self.total_duration {
            self.is_active = false;
            return true;
        }
        false
    }
}

/// Owns the facial channel of the avatar
#[derive(Debug)]
pub struct ExpressionController {
    emotion_config: EmotionConfig,
    lip_sync_config: LipSyncConfig,
    emotion: Option<EmotionPlayback>,
    blink: BlinkTimer,
    lip_sync: Option<LipSyncOverlay>,
}

impl ExpressionController {
    pub fn new(config: &EmoteConfig) -> Self {
        Self {
            emotion_config: config.emotion.clone(),
            lip_sync_config: config.lip_sync.clone(),
            emotion: None,
            blink: BlinkTimer::new(config.blink.clone()),
            lip_sync: None,
        }
    }

    /// Start an emotion with its configured duration, preempting any
    /// in-flight one. `Neutral` returns the face to rest.
    pub fn play_emotion(&mut self, preset: ExpressionPreset) {
        let duration = self.emotion_config.duration_for(preset);
        self.play_emotion_for(preset, duration);
    }

    /// Start an emotion with an explicit duration in seconds
    pub fn play_emotion_for(&mut self, preset: ExpressionPreset, duration: f32) {
        if preset == ExpressionPreset::Neutral {
            if let Some(previous) = self.emotion.take() {
                debug!("Emotion {} cleared by neutral", previous.preset);
            }
            return;
        }
        if !preset.is_emotion() {
            warn!("'{}' is not an emotion preset, ignoring", preset);
            return;
        }
        if !duration.is_finite() || duration <= 0.0 {
            warn!("Invalid emotion duration {} for {}, ignoring", duration, preset);
            return;
        }

        if let Some(previous) = self.emotion.as_ref().filter(|p| p.is_active) {
            debug!("Emotion {} preempted by {}", previous.preset, preset);
        }
        debug!("Playing emotion {} for {:.2}s", preset, duration);
        self.emotion = Some(EmotionPlayback::new(preset, duration));
    }

    /// Set the speech overlay. Most recent call wins.
    pub fn lip_sync(&mut self, preset: ExpressionPreset, value: f32) {
        if !self.lip_sync_config.enabled {
            return;
        }
        if preset == ExpressionPreset::Blink {
            warn!("Lip sync cannot drive the blink preset, ignoring");
            return;
        }
        if value.is_nan() {
            warn!("Lip sync value is NaN, ignoring");
            return;
        }
        self.lip_sync = Some(LipSyncOverlay {
            preset,
            weight: value.clamp(0.0, 1.0),
        });
    }

    /// Advance by `delta` seconds and compose the facial pose.
    ///
    /// With `skip_auto_blink` the blink timer is frozen for this tick: it is
    /// neither advanced nor reset.
    pub fn update(&mut self, delta: f32, skip_auto_blink: bool) -> FacePose {
        if !delta.is_finite() || delta < 0.0 {
            warn!("Ignoring invalid frame delta {}", delta);
            return self.pose();
        }

        if let Some(playback) = self.emotion.as_mut() {
            if playback.advance(delta) {
                debug!(
                    "Emotion {} finished after {:.2}s",
                    playback.preset, playback.elapsed
                );
            }
        }

        if !skip_auto_blink {
            self.blink.update(delta);
        }

        let pose = self.pose();

        // Decay only after the value has been shown once
        if let Some(overlay) = self.lip_sync.as_mut() {
            let decay = self.lip_sync_config.decay_per_second * delta;
            if decay > 0.0 {
                overlay.weight = (overlay.weight - decay).max(0.0);
            }
        }

        pose
    }

    /// Current facial pose without advancing time
    pub fn pose(&self) -> FacePose {
        let base = match self.active_emotion() {
            Some(playback) => FacePose {
                dominant: playback.preset,
                weight: 1.0,
                lip_sync: None,
            },
            None if self.blink.is_blinking() => FacePose {
                dominant: ExpressionPreset::Blink,
                weight: self.blink.weight(),
                lip_sync: None,
            },
            None => FacePose::neutral(),
        };
        FacePose {
            lip_sync: self.lip_sync,
            ..base
        }
    }

    fn active_emotion(&self) -> Option<&EmotionPlayback> {
        self.emotion.as_ref().filter(|p| p.is_active)
    }

    pub fn is_emotion_active(&self) -> bool {
        self.active_emotion().is_some()
    }

    /// Latest emotion playback, active or finished
    pub fn emotion(&self) -> Option<&EmotionPlayback> {
        self.emotion.as_ref()
    }

    pub fn lip_sync_weight(&self) -> Option<f32> {
        self.lip_sync.map(|o| o.weight)
    }

    pub fn blink(&self) -> &BlinkTimer {
        &self.blink
    }
}
