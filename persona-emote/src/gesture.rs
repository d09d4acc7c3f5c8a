//! Gesture controller: one-shot and looping body/eye gestures

use crate::config::GestureConfig;
use crate::preset::GestureType;
use crate::rig::GesturePose;
use tracing::{debug, warn};

/// One gesture playback instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GesturePlayback {
    pub gesture: GestureType,
    /// Wrapped to the loop length for looping playback
    pub elapsed: f32,
    /// Infinite for looping playback
    pub total_duration: f32,
    pub is_active: bool,
    pub closes_eyes: bool,
}

impl GesturePlayback {
    fn new(gesture: GestureType, total_duration: f32) -> Self {
        Self {
            gesture,
            elapsed: 0.0,
            total_duration,
            is_active: true,
            closes_eyes: gesture.closes_eyes(),
        }
    }
}

/// Owns the body channel of the avatar
#[derive(Debug)]
pub struct GestureController {
    config: GestureConfig,
    playback: Option<GesturePlayback>,
}

impl GestureController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            playback: None,
        }
    }

    /// Start a gesture with its configured duration, preempting any
    /// in-flight one
    pub fn play_gesture(&mut self, gesture: GestureType) {
        let duration = self.config.duration_for(gesture);
        self.play_gesture_for(gesture, duration);
    }

    /// Start a gesture with an explicit duration. `f32::INFINITY` loops
    /// until the next call.
    pub fn play_gesture_for(&mut self, gesture: GestureType, duration: f32) {
        if duration.is_nan() || duration <= 0.0 {
            warn!("Invalid gesture duration {} for {}, ignoring", duration, gesture);
            return;
        }
        if let Some(previous) = self.playback.as_ref().filter(|p| p.is_active) {
            debug!("Gesture {} preempted by {}", previous.gesture, gesture);
        }
        debug!("Playing gesture {} for {:.2}s", gesture, duration);
        self.playback = Some(GesturePlayback::new(gesture, duration));
    }

    /// Advance by `delta` seconds and return the pose of the active gesture.
    ///
    /// While `emotion_is_active`, an eye-closing gesture keeps playing its
    /// body motion but leaves the eyelids to the emotion.
    pub fn update(&mut self, delta: f32, emotion_is_active: bool) -> Option<GesturePose> {
        if !delta.is_finite() || delta < 0.0 {
            warn!("Ignoring invalid frame delta {}", delta);
            return self.pose(emotion_is_active);
        }

        let loop_length = self.loop_length();
        if let Some(playback) = self.playback.as_mut().filter(|p| p.is_active) {
            if playback.total_duration.is_infinite() {
                // Looping clips keep elapsed inside one loop
                playback.elapsed = (playback.elapsed + delta % loop_length) % loop_length;
            } else {
                playback.elapsed += delta;
            }
            if playback.elapsed >= playback.total_duration {
                playback.is_active = false;
                debug!(
                    "Gesture {} finished after {:.2}s",
                    playback.gesture, playback.elapsed
                );
            }
        }

        self.pose(emotion_is_active)
    }

    /// Current body pose without advancing time
    pub fn pose(&self, emotion_is_active: bool) -> Option<GesturePose> {
        let playback = self.playback.as_ref().filter(|p| p.is_active)?;
        Some(GesturePose {
            gesture: playback.gesture,
            clip_time: playback.elapsed,
            eyes_closed: playback.closes_eyes && !emotion_is_active,
        })
    }

    fn loop_length(&self) -> f32 {
        self.config.idle_loop_length.max(f32::EPSILON)
    }

    /// True while an eye-closing gesture is playing
    pub fn is_closing_eyes(&self) -> bool {
        self.playback
            .as_ref()
            .map_or(false, |p| p.is_active && p.closes_eyes)
    }

    pub fn is_gesture_active(&self) -> bool {
        self.playback.as_ref().map_or(false, |p| p.is_active)
    }

    /// Latest gesture playback, active or finished
    pub fn gesture(&self) -> Option<&GesturePlayback> {
        self.playback.as_ref()
    }
}
