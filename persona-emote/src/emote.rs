//! Emote controller - arbitrates expressions and gestures for one avatar
//!
//! The expression and gesture controllers never look at each other. Every
//! tick this orchestrator reads both activity flags and passes the derived
//! suppression values down as plain parameters:
//!
//! - an active emotion owns the eyelids, so an eye-closing gesture keeps its
//!   body motion but does not shut the eyes;
//! - with no emotion active, an eye-closing gesture freezes the blink timer
//!   so the avatar does not blink through a held closed-eyes pose.
//!
//! Flags are read before either controller advances, so a state change shows
//! up in suppression one frame later.

use crate::config::EmoteConfig;
use crate::error::EmoteError;
use crate::expression::ExpressionController;
use crate::gesture::GestureController;
use crate::preset::{ExpressionPreset, GestureType};
use crate::rig::{AppliedPose, AvatarRig, FacePose, FramePose, GesturePose};
use tracing::info;

/// Orchestrator owning both sub-controllers for one avatar session
pub struct EmoteController {
    expression: ExpressionController,
    gesture: GestureController,
    rig: Option<Box<dyn AvatarRig>>,
    applied: AppliedPose,
}

impl EmoteController {
    /// Create a new emote controller
    pub fn new(config: EmoteConfig) -> Result<Self, EmoteError> {
        config.validate().map_err(EmoteError::Config)?;
        Ok(Self {
            expression: ExpressionController::new(&config),
            gesture: GestureController::new(config.gesture.clone()),
            rig: None,
            applied: AppliedPose::default(),
        })
    }

    pub fn play_emotion(&mut self, preset: ExpressionPreset) {
        self.expression.play_emotion(preset);
    }

    pub fn play_emotion_for(&mut self, preset: ExpressionPreset, duration: f32) {
        self.expression.play_emotion_for(preset, duration);
    }

    pub fn play_gesture(&mut self, gesture: GestureType) {
        self.gesture.play_gesture(gesture);
    }

    pub fn play_gesture_for(&mut self, gesture: GestureType, duration: f32) {
        self.gesture.play_gesture_for(gesture, duration);
    }

    pub fn lip_sync(&mut self, preset: ExpressionPreset, value: f32) {
        self.expression.lip_sync(preset, value);
    }

    /// Advance both channels by `delta` seconds
    pub fn update(&mut self, delta: f32) -> FramePose {
        let is_emotion_active = self.expression.is_emotion_active();
        let skip_auto_blink = self.gesture.is_closing_eyes() && !is_emotion_active;

        let face = self.expression.update(delta, skip_auto_blink);
        let gesture = self.gesture.update(delta, is_emotion_active);

        let frame = FramePose { face, gesture };
        if let Some(rig) = self.rig.as_deref_mut() {
            frame.apply_to(rig, &mut self.applied);
        }
        frame
    }

    /// Advance only the facial channel
    pub fn update_expression(&mut self, delta: f32) -> FacePose {
        let is_emotion_active = self.expression.is_emotion_active();
        let skip_auto_blink = self.gesture.is_closing_eyes() && !is_emotion_active;

        let face = self.expression.update(delta, skip_auto_blink);
        if let Some(rig) = self.rig.as_deref_mut() {
            self.applied.apply_face(rig, &face);
        }
        face
    }

    /// Advance only the body channel
    pub fn update_gesture(&mut self, delta: f32) -> Option<GesturePose> {
        let is_emotion_active = self.expression.is_emotion_active();

        let gesture = self.gesture.update(delta, is_emotion_active);
        if let Some(rig) = self.rig.as_deref_mut() {
            self.applied.apply_gesture(rig, gesture.as_ref());
        }
        gesture
    }

    /// Whether the involuntary blink may show this frame. Derived on every
    /// call from the live flags.
    pub fn blink_eligible(&self) -> bool {
        let is_emotion_active = self.expression.is_emotion_active();
        !(is_emotion_active || (self.gesture.is_closing_eyes() && !is_emotion_active))
    }

    pub fn is_emotion_active(&self) -> bool {
        self.expression.is_emotion_active()
    }

    pub fn is_closing_eyes(&self) -> bool {
        self.gesture.is_closing_eyes()
    }

    pub fn expression(&self) -> &ExpressionController {
        &self.expression
    }

    pub fn gesture(&self) -> &GestureController {
        &self.gesture
    }

    /// Attach the model the poses should be written to. Playback state is
    /// kept; the next tick writes the full current pose to the new rig.
    pub fn bind_rig(&mut self, rig: Box<dyn AvatarRig>) -> Option<Box<dyn AvatarRig>> {
        info!("Binding avatar rig: {}", rig.rig_name());
        self.applied.reset();
        self.rig.replace(rig)
    }

    /// Detach the current rig. Commands and ticks keep working without one.
    pub fn unbind_rig(&mut self) -> Option<Box<dyn AvatarRig>> {
        let rig = self.rig.take();
        if let Some(ref rig) = rig {
            info!("Unbinding avatar rig: {}", rig.rig_name());
        }
        self.applied.reset();
        rig
    }

    pub fn has_rig(&self) -> bool {
        self.rig.is_some()
    }
}

impl std::fmt::Debug for EmoteController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmoteController")
            .field("expression", &self.expression)
            .field("gesture", &self.gesture)
            .field("rig", &self.rig.as_ref().map(|r| r.rig_name().to_string()))
            .finish()
    }
}
