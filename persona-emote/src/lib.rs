//! persona-emote: expression and gesture arbitration for avatars
//!
//! Composes four animation streams into one pose per frame:
//! - One-shot emotions (happy, surprised, ...)
//! - One-shot or looping gestures (nod, wave, close eyes, ...)
//! - Involuntary blinking on a randomized interval
//! - Speech-driven lip-sync overlay
//!
//! Single-threaded and frame-driven. Call `EmoteController::update` once per
//! render tick; the `play_*` and `lip_sync` commands may arrive at any time
//! in between.

pub mod error;
pub mod config;
pub mod preset;
pub mod blink;
pub mod expression;
pub mod gesture;
pub mod rig;
pub mod emote;

pub use error::EmoteError;
pub use config::{BlinkConfig, EmoteConfig, EmotionConfig, GestureConfig, LipSyncConfig};
pub use preset::{ExpressionPreset, GestureType};
pub use blink::{BlinkPhase, BlinkTimer};
pub use expression::{EmotionPlayback, ExpressionController};
pub use gesture::{GesturePlayback, GestureController};
pub use rig::{AppliedPose, AvatarRig, FacePose, FramePose, GesturePose, LipSyncOverlay, RecordingRig};
pub use emote::EmoteController;
