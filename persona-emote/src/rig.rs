//! Rendering seam and per-frame pose values
//!
//! The controllers only decide *what* the avatar should show each frame.
//! Turning that into blendshape weights or skeletal clips is the rig's job.

use crate::preset::{ExpressionPreset, GestureType};
use serde::Serialize;
use tracing::debug;

/// Rendering target for a single avatar model
pub trait AvatarRig: Send {
    /// Set a named expression blend weight (0.0-1.0)
    fn set_expression(&mut self, preset: ExpressionPreset, weight: f32);

    /// Play (or keep playing) a gesture clip at `clip_time` seconds
    fn play_gesture(&mut self, gesture: GestureType, clip_time: f32, eyes_closed: bool);

    /// Return the body to its rest pose
    fn stop_gesture(&mut self);

    fn rig_name(&self) -> &str {
        "rig"
    }
}

/// Lip-sync overlay value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LipSyncOverlay {
    pub preset: ExpressionPreset,
    pub weight: f32,
}

/// Facial pose for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FacePose {
    /// The single dominant expression: an emotion, the blink, or neutral
    pub dominant: ExpressionPreset,
    pub weight: f32,
    /// Speech overlay applied on top of the dominant expression
    pub lip_sync: Option<LipSyncOverlay>,
}

impl FacePose {
    /// Rest face with no overlay
    pub fn neutral() -> Self {
        Self {
            dominant: ExpressionPreset::Neutral,
            weight: 1.0,
            lip_sync: None,
        }
    }

    /// Blend weights to write this frame. The overlay adds onto the
    /// dominant weight when both name the same preset.
    pub fn weights(&self) -> Vec<(ExpressionPreset, f32)> {
        let mut weights = vec![(self.dominant, self.weight)];
        if let Some(overlay) = self.lip_sync {
            if overlay.preset == self.dominant {
                weights[0].1 = (self.weight + overlay.weight).min(1.0);
            } else {
                weights.push((overlay.preset, overlay.weight));
            }
        }
        weights
    }
}

/// Body pose for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GesturePose {
    pub gesture: GestureType,
    /// Offset into the clip, wrapped for looping gestures
    pub clip_time: f32,
    /// False when the gesture closes the eyes but an emotion owns the lids
    pub eyes_closed: bool,
}

/// Combined output of one orchestrator tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FramePose {
    pub face: FacePose,
    pub gesture: Option<GesturePose>,
}

impl FramePose {
    /// Write this frame to `rig`. `applied` remembers what earlier frames
    /// wrote so dropped presets can be zeroed and the body stopped once.
    pub fn apply_to(&self, rig: &mut dyn AvatarRig, applied: &mut AppliedPose) {
        applied.apply_face(rig, &self.face);
        applied.apply_gesture(rig, self.gesture.as_ref());
    }
}

/// What has been written to a rig so far
#[derive(Debug, Default, Clone)]
pub struct AppliedPose {
    presets: Vec<ExpressionPreset>,
    gesture_playing: bool,
}

impl AppliedPose {
    /// Forget everything written so far, e.g. after switching rigs
    pub fn reset(&mut self) {
        self.presets.clear();
        self.gesture_playing = false;
    }

    pub fn apply_face(&mut self, rig: &mut dyn AvatarRig, face: &FacePose) {
        let weights = face.weights();
        for stale in self
            .presets
            .iter()
            .filter(|p| !weights.iter().any(|(w, _)| w == *p))
        {
            rig.set_expression(*stale, 0.0);
        }
        for (preset, weight) in &weights {
            rig.set_expression(*preset, *weight);
        }
        self.presets = weights.into_iter().map(|(p, _)| p).collect();
    }

    pub fn apply_gesture(&mut self, rig: &mut dyn AvatarRig, gesture: Option<&GesturePose>) {
        match gesture {
            Some(pose) => {
                rig.play_gesture(pose.gesture, pose.clip_time, pose.eyes_closed);
                self.gesture_playing = true;
            }
            None if self.gesture_playing => {
                debug!("No active gesture, returning rig to rest");
                rig.stop_gesture();
                self.gesture_playing = false;
            }
            None => {}
        }
    }
}

/// Rig that keeps the latest state it was given. Handy for headless
/// playback and for checking what a real model would have received.
#[derive(Debug, Default, Clone)]
pub struct RecordingRig {
    pub weights: std::collections::BTreeMap<ExpressionPreset, f32>,
    pub gesture: Option<GesturePose>,
    pub calls: usize,
}

impl RecordingRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight(&self, preset: ExpressionPreset) -> f32 {
        self.weights.get(&preset).copied().unwrap_or(0.0)
    }
}

impl AvatarRig for RecordingRig {
    fn set_expression(&mut self, preset: ExpressionPreset, weight: f32) {
        self.calls += 1;
        self.weights.insert(preset, weight);
    }

    fn play_gesture(&mut self, gesture: GestureType, clip_time: f32, eyes_closed: bool) {
        self.calls += 1;
        self.gesture = Some(GesturePose {
            gesture,
            clip_time,
            eyes_closed,
        });
    }

    fn stop_gesture(&mut self) {
        self.calls += 1;
        self.gesture = None;
    }

    fn rig_name(&self) -> &str {
        "recording"
    }
}
